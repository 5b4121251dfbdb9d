//! Installed-application inventory contract and wire model.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

/// Object-safe boxed future used by [`AppInventoryService`].
pub type InventoryFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One installed application as returned by the inventory endpoint.
pub struct InstalledAppRecord {
    /// Unique key (`system-*` for platform apps, `user-*` for user deployments).
    pub key: String,
    /// Default display name.
    #[serde(default)]
    pub name: String,
    /// Icon URL.
    #[serde(default)]
    pub icon: Option<String>,
    /// Rendering kind; only `iframe` is hosted by the shell.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// `normal` or `hidden`.
    #[serde(default)]
    pub display_type: Option<String>,
    /// Launch target and description.
    #[serde(default)]
    pub data: InstalledAppData,
    /// Localized names keyed by interface language tag.
    #[serde(default)]
    pub i18n: BTreeMap<String, LocalizedAppName>,
    /// Launcher menu hints.
    #[serde(default)]
    pub menu_data: Option<AppMenuData>,
}

impl InstalledAppRecord {
    /// Builds a normally-listed iframe app record.
    pub fn iframe(key: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            icon: None,
            kind: Some("iframe".to_string()),
            display_type: Some("normal".to_string()),
            data: InstalledAppData {
                url: url.into(),
                desc: None,
            },
            i18n: BTreeMap::new(),
            menu_data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Launch target section of an inventory record.
pub struct InstalledAppData {
    /// Absolute launch URL; its origin scopes message delivery.
    #[serde(default)]
    pub url: String,
    /// Free-form description.
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Localized name entry.
pub struct LocalizedAppName {
    /// Display name in this language.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Launcher menu hints attached to an inventory record.
pub struct AppMenuData {
    /// CSS class hint for the name label.
    #[serde(default)]
    pub name_color: Option<String>,
    /// Whether the help dropdown is shown.
    #[serde(default)]
    pub help_drop_down: Option<bool>,
    /// Help documentation URL.
    #[serde(default)]
    pub help_docs: Option<String>,
}

/// Host service that lists the applications installed for the signed-in workspace.
pub trait AppInventoryService {
    /// Lists installed applications.
    fn list_installed_apps(&self) -> InventoryFuture<'_, Result<Vec<InstalledAppRecord>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Inventory with no applications.
pub struct NoopAppInventory;

impl AppInventoryService for NoopAppInventory {
    fn list_installed_apps(&self) -> InventoryFuture<'_, Result<Vec<InstalledAppRecord>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

#[derive(Debug, Clone)]
/// In-memory inventory returning a fixed response.
pub struct MemoryAppInventory {
    response: Rc<RefCell<Result<Vec<InstalledAppRecord>, String>>>,
}

impl Default for MemoryAppInventory {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryAppInventory {
    /// Creates an inventory that answers with `records`.
    pub fn new(records: Vec<InstalledAppRecord>) -> Self {
        Self {
            response: Rc::new(RefCell::new(Ok(records))),
        }
    }

    /// Creates an inventory whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Rc::new(RefCell::new(Err(message.into()))),
        }
    }
}

impl AppInventoryService for MemoryAppInventory {
    fn list_installed_apps(&self) -> InventoryFuture<'_, Result<Vec<InstalledAppRecord>, String>> {
        Box::pin(async move { self.response.borrow().clone() })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_inventory_entry() {
        let raw = r#"{
            "key": "system-dbprovider",
            "data": { "desc": "Database", "url": "https://dbprovider.example.io:443" },
            "displayType": "normal",
            "i18n": { "zh": { "name": "数据库" } },
            "icon": "https://dbprovider.example.io:443/logo.svg",
            "menuData": { "helpDocs": "https://docs.example.io/db", "helpDropDown": false, "nameColor": "text-black" },
            "name": "Database",
            "type": "iframe"
        }"#;
        let record: InstalledAppRecord = serde_json::from_str(raw).expect("decode");

        assert_eq!(record.key, "system-dbprovider");
        assert_eq!(record.kind.as_deref(), Some("iframe"));
        assert_eq!(record.display_type.as_deref(), Some("normal"));
        assert_eq!(record.data.url, "https://dbprovider.example.io:443");
        assert_eq!(
            record.i18n.get("zh").and_then(|n| n.name.as_deref()),
            Some("数据库")
        );
        assert_eq!(
            record.menu_data.and_then(|m| m.help_docs),
            Some("https://docs.example.io/db".to_string())
        );
    }

    #[test]
    fn failing_memory_inventory_reports_error() {
        let inventory = MemoryAppInventory::failing("503");
        let inventory_obj: &dyn AppInventoryService = &inventory;
        assert_eq!(
            block_on(inventory_obj.list_installed_apps()),
            Err("503".to_string())
        );
    }
}
