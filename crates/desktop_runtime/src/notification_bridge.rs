//! One-shot, deduplicated surfacing of backend global notifications.
//!
//! A notification is surfaced at most once per id: the id is persisted as the dedup marker before
//! the alert is raised, so a reload (or a later poll) never shows it again.

use std::cell::RefCell;

use platform_host::{GlobalNotificationRecord, HostAlert};

use crate::persistence::DedupMarkerStore;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Dedup state of an incoming notification id relative to the stored marker.
pub enum MarkerState {
    Unseen(String),
    Seen(String),
}

pub fn classify(marker: Option<&str>, id: &str) -> MarkerState {
    if marker == Some(id) {
        MarkerState::Seen(id.to_string())
    } else {
        MarkerState::Unseen(id.to_string())
    }
}

/// Message text for `language`, trying the primary subtag before the default message.
pub fn localized_message<'a>(record: &'a GlobalNotificationRecord, language: &str) -> Option<&'a str> {
    let primary = language.split(['-', '_']).next().unwrap_or(language);
    [language, primary]
        .into_iter()
        .find_map(|lang| {
            record
                .spec
                .i18ns
                .get(lang)
                .and_then(|entry| entry.message.as_deref())
                .map(str::trim)
                .filter(|message| !message.is_empty())
        })
        .or_else(|| Some(record.spec.message.trim()).filter(|message| !message.is_empty()))
}

#[derive(Debug)]
/// Turns notification feed records into at most one alert per id.
pub struct NotificationBridge {
    markers: DedupMarkerStore,
    /// Last id seen in this session; covers storage that fails to persist.
    last_seen: RefCell<Option<String>>,
}

impl NotificationBridge {
    pub fn new(markers: DedupMarkerStore) -> Self {
        Self {
            markers,
            last_seen: RefCell::new(None),
        }
    }

    /// Applies one feed record and returns the alert to surface, if any.
    ///
    /// Records without an id are ignored. The marker is written before the alert is returned;
    /// a storage failure is logged and the alert is still returned once.
    pub fn observe(
        &self,
        record: &GlobalNotificationRecord,
        language: &str,
    ) -> Option<HostAlert> {
        let id = record.id()?;
        if self.last_seen.borrow().as_deref() == Some(id) {
            return None;
        }

        let marker = self.markers.load().unwrap_or_else(|err| {
            leptos::logging::warn!("notification marker load failed: {err}");
            None
        });
        *self.last_seen.borrow_mut() = Some(id.to_string());
        let MarkerState::Unseen(id) = classify(marker.as_deref(), id) else {
            return None;
        };

        if let Err(err) = self.markers.save(&id) {
            leptos::logging::warn!("notification marker save failed: {err}");
        }
        localized_message(record, language).map(HostAlert::info)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{MemoryPrefsStore, PrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;

    /// Store whose writes always fail.
    struct ReadOnlyPrefs;

    impl PrefsStore for ReadOnlyPrefs {
        fn load_pref(&self, _key: &str) -> Result<Option<String>, String> {
            Ok(None)
        }

        fn save_pref(&self, _key: &str, _raw: &str) -> Result<(), String> {
            Err("quota exceeded".to_string())
        }

        fn delete_pref(&self, _key: &str) -> Result<(), String> {
            Ok(())
        }
    }

    fn bridge(prefs: &MemoryPrefsStore) -> NotificationBridge {
        NotificationBridge::new(DedupMarkerStore::new(Rc::new(prefs.clone())))
    }

    #[test]
    fn same_notification_surfaces_once() {
        let prefs = MemoryPrefsStore::default();
        let bridge = bridge(&prefs);
        let record = GlobalNotificationRecord::new("n1", "Maintenance tonight");

        assert_eq!(
            bridge.observe(&record, "en"),
            Some(HostAlert::info("Maintenance tonight"))
        );
        assert_eq!(bridge.observe(&record, "en"), None);
        assert_eq!(
            prefs.load_pref("GlobalNotification"),
            Ok(Some("n1".to_string()))
        );
    }

    #[test]
    fn seen_marker_survives_reload() {
        let prefs = MemoryPrefsStore::default();
        let record = GlobalNotificationRecord::new("n1", "Maintenance tonight");
        assert!(bridge(&prefs).observe(&record, "en").is_some());

        // A reload keeps only the persisted marker.
        let reloaded = bridge(&prefs);
        assert_eq!(reloaded.observe(&record, "en"), None);

        let next = GlobalNotificationRecord::new("n2", "Upgrade done");
        assert_eq!(
            reloaded.observe(&next, "en"),
            Some(HostAlert::info("Upgrade done"))
        );
        assert_eq!(
            prefs.load_pref("GlobalNotification"),
            Ok(Some("n2".to_string()))
        );
    }

    #[test]
    fn localized_message_prefers_language_then_default() {
        let record = GlobalNotificationRecord::new("n1", "Maintenance").with_localized("zh", "维护");

        assert_eq!(localized_message(&record, "zh"), Some("维护"));
        assert_eq!(localized_message(&record, "zh-CN"), Some("维护"));
        assert_eq!(localized_message(&record, "fr"), Some("Maintenance"));
    }

    #[test]
    fn notification_without_id_or_text() {
        let prefs = MemoryPrefsStore::default();
        let bridge = bridge(&prefs);

        assert_eq!(
            bridge.observe(&GlobalNotificationRecord::default(), "en"),
            None
        );
        assert!(prefs.is_empty());

        // Marked seen even though there is nothing to show.
        assert_eq!(bridge.observe(&GlobalNotificationRecord::new("n3", " "), "en"), None);
        assert_eq!(
            prefs.load_pref("GlobalNotification"),
            Ok(Some("n3".to_string()))
        );
    }

    #[test]
    fn failed_persist_still_surfaces_once_per_session() {
        let bridge = NotificationBridge::new(DedupMarkerStore::new(Rc::new(ReadOnlyPrefs)));
        let record = GlobalNotificationRecord::new("n1", "Maintenance");

        assert!(bridge.observe(&record, "en").is_some());
        assert_eq!(bridge.observe(&record, "en"), None);
    }

    #[test]
    fn classify_compares_against_marker() {
        assert_eq!(classify(Some("n1"), "n1"), MarkerState::Seen("n1".to_string()));
        assert_eq!(classify(Some("n1"), "n2"), MarkerState::Unseen("n2".to_string()));
        assert_eq!(classify(None, "n1"), MarkerState::Unseen("n1".to_string()));
    }
}
