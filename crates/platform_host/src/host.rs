//! Host service bundle injected into the desktop runtime.

use std::rc::Rc;

use crate::{
    AppInventoryService, FrameTransport, MemoryAppInventory, MemoryNotificationFeed,
    MemoryPrefsStore, MemorySessionService, NotificationFeed, NotificationService, PrefsStore,
    RecordingFrameTransport, RecordingNotificationService, SessionService, SessionSnapshot,
};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed adapters (`fetch`, `localStorage`, `postMessage`).
    Browser,
    /// Placeholder adapters for builds without a browser document.
    Stub,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Stub => "stub",
        }
    }
}

/// Runtime-selected host service bundle.
///
/// All environment-specific adapter selection happens before this bundle crosses into
/// `desktop_runtime`, so the runtime never touches browser APIs directly.
#[derive(Clone)]
pub struct HostServices {
    /// Durable client-side key/value storage.
    pub prefs: Rc<dyn PrefsStore>,
    /// Shell-level alert delivery.
    pub notifications: Rc<dyn NotificationService>,
    /// Backend global-notification feed.
    pub notification_feed: Rc<dyn NotificationFeed>,
    /// Installed-application inventory.
    pub inventory: Rc<dyn AppInventoryService>,
    /// Cross-frame message transport.
    pub frames: Rc<dyn FrameTransport>,
    /// Account/session collaborator.
    pub session: Rc<dyn SessionService>,
    /// Strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

/// In-memory adapters backing a [`HostServices`] bundle, kept so callers can inspect them.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    /// Preference storage.
    pub prefs: MemoryPrefsStore,
    /// Recorded alerts.
    pub notifications: RecordingNotificationService,
    /// Notification feed.
    pub notification_feed: MemoryNotificationFeed,
    /// Inventory.
    pub inventory: MemoryAppInventory,
    /// Frame transport.
    pub frames: RecordingFrameTransport,
    /// Session collaborator.
    pub session: MemorySessionService,
}

impl MemoryHost {
    /// Creates memory adapters with a signed-in session.
    pub fn signed_in(inventory: MemoryAppInventory) -> Self {
        Self {
            inventory,
            session: MemorySessionService::new(SessionSnapshot::signed_in("tester")),
            ..Self::default()
        }
    }

    /// Builds a [`HostServices`] bundle sharing these adapters.
    pub fn services(&self) -> HostServices {
        HostServices {
            prefs: Rc::new(self.prefs.clone()),
            notifications: Rc::new(self.notifications.clone()),
            notification_feed: Rc::new(self.notification_feed.clone()),
            inventory: Rc::new(self.inventory.clone()),
            frames: Rc::new(self.frames.clone()),
            session: Rc::new(self.session.clone()),
            host_strategy: HostStrategy::Stub,
        }
    }
}
