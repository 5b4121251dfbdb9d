//! Session collaborator reading the persisted account session from `localStorage`.
//!
//! The sign-in flow owns the stored value; the shell only reads it and removes it on sign-out.

use platform_host::{PrefsStore, SessionService, SessionSnapshot};
use serde::Deserialize;

use crate::WebPrefsStore;

/// `localStorage` key holding the persisted session.
pub const DEFAULT_SESSION_KEY: &str = "session";

#[derive(Debug, Deserialize)]
struct StoredSession {
    #[serde(default)]
    user: Option<StoredUser>,
}

#[derive(Debug, Deserialize)]
struct StoredUser {
    #[serde(default)]
    name: Option<String>,
}

/// Maps a stored session value to the snapshot the shell sees.
///
/// A value that is missing, unparsable, or has no user is treated as signed out.
pub fn snapshot_from_stored(raw: Option<&str>) -> SessionSnapshot {
    let Some(stored) = raw.and_then(|raw| serde_json::from_str::<StoredSession>(raw).ok()) else {
        return SessionSnapshot::default();
    };
    match stored.user {
        Some(user) => SessionSnapshot {
            signed_in: true,
            display_name: user.name.filter(|name| !name.trim().is_empty()),
        },
        None => SessionSnapshot::default(),
    }
}

#[derive(Debug, Clone)]
/// Session collaborator backed by a prefs store key.
pub struct WebSessionService<S = WebPrefsStore> {
    store: S,
    key: String,
}

impl WebSessionService {
    /// Reads the session from `localStorage[key]`.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_store(WebPrefsStore, key)
    }
}

impl<S: PrefsStore> WebSessionService<S> {
    /// Reads the session from `key` in an arbitrary prefs store.
    pub fn with_store(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: PrefsStore> SessionService for WebSessionService<S> {
    fn current_session(&self) -> SessionSnapshot {
        match self.store.load_pref(&self.key) {
            Ok(raw) => snapshot_from_stored(raw.as_deref()),
            Err(_) => SessionSnapshot::default(),
        }
    }

    fn sign_out(&self) -> Result<(), String> {
        self.store.delete_pref(&self.key)
    }
}
