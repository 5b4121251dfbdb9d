use std::time::Duration;

use leptos::{logging, on_cleanup, set_interval_with_handle, SignalWithUntracked};
use platform_host::unix_time_ms_now;

use crate::{
    host::DesktopHostContext,
    message_router::Delivery,
    model::{DeliveryAttempt, OutboundMessage},
    reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

/// Action to dispatch after a delivery attempt, if any.
///
/// A failed first attempt is queued until the frame is ready; a failed retry is dropped.
pub fn delivery_followup(
    delivery: &Delivery,
    message: OutboundMessage,
    now_ms: u64,
) -> Option<DesktopAction> {
    let Delivery::NotDeliverable(reason) = delivery else {
        return None;
    };
    match message.attempt {
        DeliveryAttempt::Initial => Some(DesktopAction::QueuePendingMessage {
            message,
            queued_at_ms: now_ms,
        }),
        DeliveryAttempt::AfterReady => {
            logging::warn!(
                "dropping message for `{}` (pid {}): {reason:?}",
                message.app_key,
                message.pid
            );
            None
        }
    }
}

pub(super) fn deliver(
    host: &DesktopHostContext,
    runtime: DesktopRuntimeContext,
    message: OutboundMessage,
) {
    let delivery = runtime.state.with_untracked(|desktop| {
        host.router()
            .send(desktop, &message.app_key, &message.payload)
    });
    if let Some(action) = delivery_followup(&delivery, message, unix_time_ms_now()) {
        runtime.dispatch_action(action);
    }
}

pub(super) fn install_pending_sweep(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let ttl_ms = u64::from(host.config().pending_message_ttl_ms);
    let every = Duration::from_millis(u64::from(host.config().pending_sweep_interval_ms));
    let sweep = move || {
        if runtime.state.with_untracked(|desktop| desktop.pending.is_empty()) {
            return;
        }
        runtime.dispatch_action(DesktopAction::ExpirePendingMessages {
            now_ms: unix_time_ms_now(),
            ttl_ms,
        });
    };
    match set_interval_with_handle(sweep, every) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => logging::warn!("pending message sweep not installed: {err:?}"),
    }
}
