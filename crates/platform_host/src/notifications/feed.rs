//! Backend global-notification feed contract and wire model.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

/// Object-safe boxed future used by [`NotificationFeed`].
pub type NotificationFeedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Latest global notification as published by the platform backend.
pub struct GlobalNotificationRecord {
    /// Resource metadata; `uid` identifies the notification.
    #[serde(default)]
    pub metadata: NotificationMetadata,
    /// Message content.
    #[serde(default)]
    pub spec: NotificationSpec,
}

impl GlobalNotificationRecord {
    /// Builds a record with an id and a default-language message.
    pub fn new(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            metadata: NotificationMetadata {
                uid: Some(uid.into()),
            },
            spec: NotificationSpec {
                message: message.into(),
                i18ns: BTreeMap::new(),
            },
        }
    }

    /// Adds a localized message variant for `lang`.
    pub fn with_localized(mut self, lang: impl Into<String>, message: impl Into<String>) -> Self {
        self.spec.i18ns.insert(
            lang.into(),
            LocalizedMessage {
                message: Some(message.into()),
            },
        );
        self
    }

    /// Returns the notification id when present and non-blank.
    pub fn id(&self) -> Option<&str> {
        self.metadata
            .uid
            .as_deref()
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Notification resource metadata.
pub struct NotificationMetadata {
    /// Stable notification identifier.
    #[serde(default)]
    pub uid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Notification message content.
pub struct NotificationSpec {
    /// Default-language message.
    #[serde(default)]
    pub message: String,
    /// Localized variants keyed by interface language tag.
    #[serde(default)]
    pub i18ns: BTreeMap<String, LocalizedMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// One localized message variant.
pub struct LocalizedMessage {
    /// Message text in this language.
    #[serde(default)]
    pub message: Option<String>,
}

/// Host service that fetches the latest global notification.
pub trait NotificationFeed {
    /// Fetches the latest notification, or `None` when nothing is published.
    fn fetch_latest(
        &self,
    ) -> NotificationFeedFuture<'_, Result<Option<GlobalNotificationRecord>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Feed that never publishes anything.
pub struct NoopNotificationFeed;

impl NotificationFeed for NoopNotificationFeed {
    fn fetch_latest(
        &self,
    ) -> NotificationFeedFuture<'_, Result<Option<GlobalNotificationRecord>, String>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory feed whose current record is set by the test or host.
pub struct MemoryNotificationFeed {
    current: Rc<RefCell<Option<GlobalNotificationRecord>>>,
}

impl MemoryNotificationFeed {
    /// Replaces the currently published record.
    pub fn publish(&self, record: GlobalNotificationRecord) {
        *self.current.borrow_mut() = Some(record);
    }
}

impl NotificationFeed for MemoryNotificationFeed {
    fn fetch_latest(
        &self,
    ) -> NotificationFeedFuture<'_, Result<Option<GlobalNotificationRecord>, String>> {
        Box::pin(async move { Ok(self.current.borrow().clone()) })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_platform_payload_with_localized_variants() {
        let raw = r#"{
            "metadata": { "uid": "3f2a" },
            "spec": { "message": "Scheduled maintenance", "i18ns": { "zh": { "message": "计划维护" } } }
        }"#;
        let record: GlobalNotificationRecord = serde_json::from_str(raw).expect("decode");

        assert_eq!(record.id(), Some("3f2a"));
        assert_eq!(
            record,
            GlobalNotificationRecord::new("3f2a", "Scheduled maintenance")
                .with_localized("zh", "计划维护")
        );
    }

    #[test]
    fn blank_uid_is_not_an_id() {
        let record: GlobalNotificationRecord =
            serde_json::from_str(r#"{ "metadata": { "uid": "  " } }"#).expect("decode");
        assert_eq!(record.id(), None);
    }
}
