//! Process and window manager for a browser-hosted desktop shell.
//!
//! Installed web applications run inside `<iframe>` "processes". The runtime keeps the catalog of
//! installed applications, the process table and its stacking order, routes structured messages to
//! and from the frames, and surfaces deduplicated global notifications. All state changes go
//! through [`reduce_desktop`]; Leptos components only read the state and dispatch actions.

pub mod components;
pub mod config;
mod effect_executor;
pub mod host;
pub mod inbound_commands;
pub mod message_router;
pub mod model;
pub mod notification_bridge;
pub mod persistence;
pub mod reducer;
pub mod registry;
mod runtime_context;
pub mod window_manager;

pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use config::{ConfigError, ShellConfig};
pub use message_router::{
    CommandRegistry, Delivery, InboundCommand, InboundOutcome, MessageRouter, NotDeliverable,
    Subscription,
};
pub use model::*;
pub use notification_bridge::{MarkerState, NotificationBridge};
pub use persistence::{DedupMarkerStore, GLOBAL_NOTIFICATION_MARKER_KEY};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use registry::{ApplicationRegistry, RegistryError};
