//! Installed-application inventory fetched from the platform backend.

use platform_host::{AppInventoryService, InstalledAppRecord, InventoryFuture};

use crate::http;

#[derive(Debug, Clone)]
/// Inventory adapter issuing `GET <endpoint>` and decoding the record list.
pub struct WebAppInventory {
    endpoint: String,
}

impl WebAppInventory {
    /// Creates an inventory reading from `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl AppInventoryService for WebAppInventory {
    fn list_installed_apps(&self) -> InventoryFuture<'_, Result<Vec<InstalledAppRecord>, String>> {
        Box::pin(async move {
            let records: Option<Vec<InstalledAppRecord>> = http::get_json(&self.endpoint).await?;
            Ok(records.unwrap_or_default())
        })
    }
}
