use std::rc::Rc;

use platform_host::{
    AppInventoryService, FrameTransport, HostServices, HostStrategy, MemorySessionService,
    NoopAppInventory, NoopFrameTransport, NoopNotificationFeed, NoopNotificationService,
    NoopPrefsStore, NotificationFeed, NotificationService, PrefsStore, SessionService,
};

use crate::{
    session::DEFAULT_SESSION_KEY, WebAppInventory, WebFrameTransport, WebNotificationFeed,
    WebNotificationService, WebPrefsStore, WebSessionService,
};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Backend locations the browser adapters talk to.
pub struct WebHostConfig {
    /// Installed-application inventory endpoint.
    pub inventory_endpoint: String,
    /// Latest global-notification endpoint.
    pub notification_endpoint: String,
    /// `localStorage` key holding the persisted session.
    pub session_key: String,
}

impl WebHostConfig {
    /// Config for the given endpoints with the default session key.
    pub fn new(inventory_endpoint: impl Into<String>, notification_endpoint: impl Into<String>) -> Self {
        Self {
            inventory_endpoint: inventory_endpoint.into(),
            notification_endpoint: notification_endpoint.into(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

/// Preference store for the selected strategy.
pub fn prefs_store() -> Rc<dyn PrefsStore> {
    match selected_host_strategy() {
        HostStrategy::Browser => Rc::new(WebPrefsStore),
        HostStrategy::Stub => Rc::new(NoopPrefsStore),
    }
}

/// Alert delivery service for the selected strategy.
pub fn notification_service() -> Rc<dyn NotificationService> {
    match selected_host_strategy() {
        HostStrategy::Browser => Rc::new(WebNotificationService),
        HostStrategy::Stub => Rc::new(NoopNotificationService),
    }
}

/// Frame transport for the selected strategy.
pub fn frame_transport() -> Rc<dyn FrameTransport> {
    match selected_host_strategy() {
        HostStrategy::Browser => Rc::new(WebFrameTransport),
        HostStrategy::Stub => Rc::new(NoopFrameTransport),
    }
}

/// Builds the host service bundle injected into `desktop_runtime`.
pub fn build_host_services(config: &WebHostConfig) -> HostServices {
    let strategy = selected_host_strategy();
    let (inventory, notification_feed, session): (
        Rc<dyn AppInventoryService>,
        Rc<dyn NotificationFeed>,
        Rc<dyn SessionService>,
    ) = match strategy {
        HostStrategy::Browser => (
            Rc::new(WebAppInventory::new(config.inventory_endpoint.clone())),
            Rc::new(WebNotificationFeed::new(config.notification_endpoint.clone())),
            Rc::new(WebSessionService::new(config.session_key.clone())),
        ),
        HostStrategy::Stub => (
            Rc::new(NoopAppInventory),
            Rc::new(NoopNotificationFeed),
            Rc::new(MemorySessionService::default()),
        ),
    };

    HostServices {
        prefs: prefs_store(),
        notifications: notification_service(),
        notification_feed,
        inventory,
        frames: frame_transport(),
        session,
        host_strategy: strategy,
    }
}
