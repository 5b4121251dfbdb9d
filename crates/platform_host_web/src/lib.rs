//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer: `localStorage` preferences and
//! session, Web Notifications, `fetch`-backed inventory and notification feed, and the
//! `postMessage` frame transport. Native builds compile the same adapters against inert shims.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod frames;
mod http;
pub mod inventory;
pub mod notifications;
pub mod session;
pub mod storage;

pub use adapters::{
    build_host_services, frame_transport, host_strategy_name, notification_service, prefs_store,
    selected_host_strategy, WebHostConfig,
};
pub use frames::WebFrameTransport;
pub use inventory::WebAppInventory;
pub use notifications::{WebNotificationFeed, WebNotificationService};
pub use session::{snapshot_from_stored, WebSessionService, DEFAULT_SESSION_KEY};
pub use storage::local_prefs::WebPrefsStore;
