//! Durable dedup marker for global notifications.
//!
//! The marker is the only value the shell persists. It is stored as the raw notification id
//! (no JSON wrapping) under [`GLOBAL_NOTIFICATION_MARKER_KEY`] unless configuration overrides the
//! key.

use std::rc::Rc;

use platform_host::PrefsStore;

/// Storage key holding the id of the last surfaced global notification.
pub const GLOBAL_NOTIFICATION_MARKER_KEY: &str = "GlobalNotification";

#[derive(Clone)]
/// `load()/save(id)` access to the persisted notification marker.
pub struct DedupMarkerStore {
    prefs: Rc<dyn PrefsStore>,
    key: String,
}

impl DedupMarkerStore {
    pub fn new(prefs: Rc<dyn PrefsStore>) -> Self {
        Self::with_key(prefs, GLOBAL_NOTIFICATION_MARKER_KEY)
    }

    pub fn with_key(prefs: Rc<dyn PrefsStore>, key: impl Into<String>) -> Self {
        Self {
            prefs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the persisted marker; blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns the storage error unchanged.
    pub fn load(&self) -> Result<Option<String>, String> {
        Ok(self
            .prefs
            .load_pref(&self.key)?
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty()))
    }

    /// Replaces the persisted marker with `id`.
    ///
    /// # Errors
    ///
    /// Returns the storage error unchanged.
    pub fn save(&self, id: &str) -> Result<(), String> {
        self.prefs.save_pref(&self.key, id)
    }
}

impl std::fmt::Debug for DedupMarkerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupMarkerStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
