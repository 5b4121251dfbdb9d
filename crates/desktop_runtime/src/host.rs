//! Host-side runtime helpers for executing reducer effects and talking to host services.
//!
//! Everything that touches an injected [`HostServices`] adapter lives behind this boundary, so the
//! reducer stays pure and the effect handlers can be exercised against the in-memory adapters.

mod boot;
mod browser;
mod effects;
mod frame_effects;
mod notification_effects;

use std::rc::Rc;

use leptos::Callback;
use platform_host::{HostAlert, HostServices};

use crate::{
    config::ShellConfig,
    message_router::MessageRouter,
    notification_bridge::NotificationBridge,
    persistence::DedupMarkerStore,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

pub use self::frame_effects::delivery_followup;

#[derive(Clone)]
/// Host service bundle plus the long-lived helpers built on top of it.
pub struct DesktopHostContext {
    services: HostServices,
    router: MessageRouter,
    bridge: Rc<NotificationBridge>,
    config: Rc<ShellConfig>,
}

impl DesktopHostContext {
    /// Wraps an injected host bundle.
    pub fn new(services: HostServices, config: ShellConfig) -> Self {
        let markers =
            DedupMarkerStore::with_key(services.prefs.clone(), config.notification_marker_key.clone());
        Self {
            router: MessageRouter::new(services.frames.clone()),
            bridge: Rc::new(NotificationBridge::new(markers)),
            config: Rc::new(config),
            services,
        }
    }

    pub fn services(&self) -> &HostServices {
        &self.services
    }

    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.services.host_strategy.as_str()
    }

    /// Origin of the shell document; inbound messages from it are always accepted.
    pub fn shell_origin(&self) -> String {
        browser::shell_origin()
    }

    /// Reads the session, then loads the inventory.
    pub fn install_boot(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot(self.clone(), dispatch);
    }

    /// Starts notification polling and the pending-message sweep for the lifetime of the owner.
    pub fn install_timers(&self, runtime: DesktopRuntimeContext) {
        notification_effects::install_polling(self.clone(), runtime);
        frame_effects::install_pending_sweep(self.clone(), runtime);
    }

    /// Fetches the inventory and converts the result into the action that applies it.
    pub async fn load_registry(&self) -> DesktopAction {
        boot::load_registry(self).await
    }

    /// Fetches the latest global notification and surfaces it if unseen.
    pub async fn poll_notifications(&self, language: &str) -> Option<HostAlert> {
        notification_effects::poll_once(self, language).await
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        effects::run_runtime_effect(self.clone(), runtime, effect);
    }
}
