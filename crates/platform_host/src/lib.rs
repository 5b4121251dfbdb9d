//! Typed host-domain contracts shared by the desktop runtime and its browser adapters.
//!
//! This crate is the API-first boundary for everything the shell consumes from its environment:
//! client-side preference storage, alert delivery, the global-notification feed, the installed
//! application inventory, cross-frame messaging, and the session collaborator. Concrete browser
//! adapters live in `platform_host_web`; the in-memory adapters here back native builds and tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod frames;
pub mod host;
pub mod inventory;
pub mod notifications;
pub mod session;
pub mod storage;
pub mod time;

pub use frames::{
    FrameDelivery, FrameListener, FrameTransport, InboundFrameMessage, InboundHandler,
    NoopFrameTransport, PostedFrameMessage, RecordingFrameTransport,
};
pub use host::{HostServices, HostStrategy, MemoryHost};
pub use inventory::{
    AppInventoryService, AppMenuData, InstalledAppData, InstalledAppRecord, InventoryFuture,
    LocalizedAppName, MemoryAppInventory, NoopAppInventory,
};
pub use notifications::feed::{
    GlobalNotificationRecord, LocalizedMessage, MemoryNotificationFeed, NoopNotificationFeed,
    NotificationFeed, NotificationFeedFuture, NotificationMetadata, NotificationSpec,
};
pub use notifications::service::{
    AlertLevel, HostAlert, NoopNotificationService, NotificationFuture, NotificationService,
    RecordingNotificationService,
};
pub use session::{MemorySessionService, SessionService, SessionSnapshot};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
};
pub use time::unix_time_ms_now;
