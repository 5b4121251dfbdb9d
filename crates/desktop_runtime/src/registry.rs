//! Installed-application catalog built from inventory records.

use platform_host::InstalledAppRecord;
use thiserror::Error;
use url::Url;

use crate::model::{AppKey, Application, DisplayType};

const HOSTED_KIND: &str = "iframe";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons an inventory record is left out of the catalog.
pub enum RegistryError {
    /// The record has an empty key.
    #[error("inventory record without a key")]
    MissingKey,
    /// A record with the same key was already accepted.
    #[error("duplicate application key `{0}`")]
    DuplicateKey(String),
    /// The launch URL is not an absolute http(s) URL.
    #[error("application `{key}` has an invalid launch url: {reason}")]
    InvalidLaunchUrl {
        /// Offending key.
        key: String,
        /// Parser or scheme error.
        reason: String,
    },
    /// The record is not rendered in a frame.
    #[error("application `{key}` has unsupported type `{kind}`")]
    UnsupportedKind {
        /// Offending key.
        key: String,
        /// Declared type.
        kind: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Read-only catalog of launchable applications for the current session.
pub struct ApplicationRegistry {
    apps: Vec<Application>,
}

impl ApplicationRegistry {
    /// Builds a catalog from inventory records, skipping (and reporting) invalid ones.
    ///
    /// When two records share a key the first one wins.
    pub fn from_records(records: Vec<InstalledAppRecord>) -> (Self, Vec<RegistryError>) {
        let mut apps: Vec<Application> = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for record in records {
            match application_from_record(record) {
                Ok(app) if apps.iter().any(|existing| existing.key == app.key) => {
                    rejected.push(RegistryError::DuplicateKey(app.key.to_string()));
                }
                Ok(app) => apps.push(app),
                Err(err) => rejected.push(err),
            }
        }

        (Self { apps }, rejected)
    }

    pub fn list(&self) -> &[Application] {
        &self.apps
    }

    /// Applications shown in the launcher, in inventory order.
    pub fn launcher_apps(&self) -> impl Iterator<Item = &Application> {
        self.apps.iter().filter(|app| app.is_listed())
    }

    pub fn find(&self, key: &AppKey) -> Option<&Application> {
        self.apps.iter().find(|app| &app.key == key)
    }

    /// Finds the application whose launch origin equals `origin`.
    pub fn find_by_origin(&self, origin: &str) -> Option<&Application> {
        self.apps.iter().find(|app| app.origin() == origin)
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

fn application_from_record(record: InstalledAppRecord) -> Result<Application, RegistryError> {
    let key = record.key.trim().to_string();
    if key.is_empty() {
        return Err(RegistryError::MissingKey);
    }

    if let Some(kind) = record.kind.as_deref() {
        if kind != HOSTED_KIND {
            return Err(RegistryError::UnsupportedKind {
                key,
                kind: kind.to_string(),
            });
        }
    }

    let launch_url = Url::parse(record.data.url.trim()).map_err(|err| {
        RegistryError::InvalidLaunchUrl {
            key: key.clone(),
            reason: err.to_string(),
        }
    })?;
    if !matches!(launch_url.scheme(), "http" | "https") {
        return Err(RegistryError::InvalidLaunchUrl {
            key,
            reason: format!("scheme `{}` is not http(s)", launch_url.scheme()),
        });
    }

    let localized_names = record
        .i18n
        .into_iter()
        .filter_map(|(lang, entry)| entry.name.map(|name| (lang, name)))
        .collect();
    let (name_color, help_docs) = record
        .menu_data
        .map(|menu| (menu.name_color, menu.help_docs))
        .unwrap_or_default();
    let name = if record.name.trim().is_empty() {
        key.clone()
    } else {
        record.name
    };

    Ok(Application {
        key: AppKey::new(key),
        name,
        localized_names,
        icon: record.icon.filter(|icon| !icon.trim().is_empty()),
        description: record.data.desc,
        launch_url,
        display_type: DisplayType::from_wire(record.display_type.as_deref()),
        name_color,
        help_docs,
    })
}

#[cfg(test)]
mod tests {
    use platform_host::LocalizedAppName;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::AppSource;

    fn record(key: &str, url: &str) -> InstalledAppRecord {
        InstalledAppRecord::iframe(key, key.trim_start_matches("system-"), url)
    }

    #[test]
    fn builds_catalog_and_filters_launcher_entries() {
        let mut hidden = record("system-license", "https://license.example");
        hidden.display_type = Some("hidden".to_string());
        let mut user_app = record("user-nocodb-sxsshrdt", "https://nocodb-pzpcyojr.example");
        user_app.i18n.insert(
            "zh".to_string(),
            LocalizedAppName {
                name: Some("表格".to_string()),
            },
        );

        let (registry, rejected) = ApplicationRegistry::from_records(vec![
            record("system-terminal", "https://terminal.example:443"),
            hidden,
            user_app,
        ]);

        assert!(rejected.is_empty());
        assert_eq!(registry.list().len(), 3);
        let launcher: Vec<_> = registry
            .launcher_apps()
            .map(|app| app.key.as_str())
            .collect();
        assert_eq!(launcher, vec!["system-terminal", "user-nocodb-sxsshrdt"]);

        let user_app = registry
            .find(&AppKey::new("user-nocodb-sxsshrdt"))
            .expect("user app");
        assert_eq!(user_app.source(), AppSource::User);
        assert_eq!(user_app.display_name("zh"), "表格");
        assert_eq!(
            registry
                .find_by_origin("https://terminal.example")
                .map(|app| app.key.as_str()),
            Some("system-terminal")
        );
    }

    #[test]
    fn rejects_invalid_records_and_keeps_first_duplicate() {
        let mut link = record("system-docs", "https://docs.example");
        link.kind = Some("link".to_string());

        let (registry, rejected) = ApplicationRegistry::from_records(vec![
            record("system-terminal", "https://terminal.example"),
            record("system-terminal", "https://evil.example"),
            record("", "https://blank.example"),
            record("system-broken", "not a url"),
            record("system-script", "javascript:alert(1)"),
            link,
        ]);

        assert_eq!(registry.list().len(), 1);
        assert_eq!(
            registry
                .find(&AppKey::new("system-terminal"))
                .map(Application::origin),
            Some("https://terminal.example".to_string())
        );
        assert_eq!(rejected.len(), 5);
        assert_eq!(
            rejected[0],
            RegistryError::DuplicateKey("system-terminal".to_string())
        );
        assert_eq!(rejected[1], RegistryError::MissingKey);
        assert!(matches!(
            rejected[2],
            RegistryError::InvalidLaunchUrl { ref key, .. } if key == "system-broken"
        ));
        assert!(matches!(
            rejected[3],
            RegistryError::InvalidLaunchUrl { ref key, .. } if key == "system-script"
        ));
        assert!(matches!(rejected[4], RegistryError::UnsupportedKind { .. }));
    }

    #[test]
    fn empty_inventory_is_an_empty_catalog() {
        let (registry, rejected) = ApplicationRegistry::from_records(Vec::new());
        assert!(registry.is_empty());
        assert!(rejected.is_empty());
        assert_eq!(registry.find(&AppKey::new("system-terminal")), None);
    }
}
