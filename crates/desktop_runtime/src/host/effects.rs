//! Runtime-effect dispatch for the desktop host boundary.

use leptos::{logging, spawn_local, Callable, SignalWithUntracked};

use crate::{
    host::{boot, browser, frame_effects, DesktopHostContext},
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

pub(super) fn run_runtime_effect(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
    effect: RuntimeEffect,
) {
    match effect {
        RuntimeEffect::LoadRegistry => {
            let dispatch = runtime.dispatch;
            spawn_local(async move {
                dispatch.call(boot::load_registry(&host).await);
            });
        }
        RuntimeEffect::SendFrameMessage(message) => {
            frame_effects::deliver(&host, runtime, message);
        }
        RuntimeEffect::FocusFrame(pid) => {
            let dom_id = runtime
                .state
                .with_untracked(|desktop| desktop.process(pid).map(|p| p.frame_dom_id()));
            if let Some(dom_id) = dom_id {
                browser::focus_frame(&dom_id);
            }
        }
        RuntimeEffect::EndSession => {
            if let Err(err) = host.services().session.sign_out() {
                logging::warn!("sign out failed: {err}");
            }
        }
    }
}
