//! Desktop shell UI composition: launcher sidebar and the layer of hosted application frames.

mod app_frame;
mod launcher;

use leptos::*;

use self::{app_frame::AppFrame, launcher::LauncherSidebar};

use platform_host::AlertLevel;

use crate::{
    model::{DesktopState, Pid},
    reducer::{DesktopAction, ReducerError},
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

/// Pids in creation order.
///
/// Frames are rendered in this order so that raising a process only changes `z-index`; moving an
/// `<iframe>` in the document would reload it.
fn mount_order(desktop: &DesktopState) -> Vec<Pid> {
    let mut pids = desktop.z_order();
    pids.sort_unstable();
    pids
}

fn log_ui_error(action: &str, result: Result<impl Sized, ReducerError>) {
    if let Err(err) = result {
        logging::warn!("{action} ignored: {err}");
    }
}

#[component]
/// Renders the desktop shell: launcher plus every running application frame.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let sidebar_open = Signal::derive(move || state.with(|desktop| desktop.sidebar_open));

    view! {
        <div
            class="desktop-shell"
            class:sidebar-collapsed=move || !sidebar_open.get()
            data-host-strategy=runtime.host.get_value().host_strategy_name()
        >
            <LauncherSidebar />
            <AlertStack />
            <main class="desktop-frame-layer">
                <Show
                    when=move || state.with(|desktop| desktop.processes.is_empty())
                    fallback=|| ()
                >
                    <div class="desktop-empty">
                        {move || runtime.host.get_value().config().title.clone()}
                    </div>
                </Show>
                <For
                    each=move || state.with(mount_order)
                    key=|pid| *pid
                    let:pid
                >
                    <AppFrame pid=pid />
                </For>
            </main>
        </div>
    }
}

#[component]
/// Sticky in-page alerts; each stays until dismissed.
fn AlertStack() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    view! {
        <section class="desktop-alerts" aria-live="polite">
            <For each=move || state.with(|desktop| desktop.alerts.clone()) key=|entry| entry.id let:entry>
                {{
                    let id = entry.id;
                    let level = match entry.alert.level {
                        AlertLevel::Info => "info",
                        AlertLevel::Warning => "warning",
                    };
                    view! {
                        <div class=format!("desktop-alert desktop-alert-{level}") role="status">
                            <strong class="desktop-alert-title">{entry.alert.title.clone()}</strong>
                            {entry
                                .alert
                                .body
                                .clone()
                                .map(|body| view! { <p class="desktop-alert-body">{body}</p> })}
                            <button
                                class="desktop-alert-dismiss"
                                aria-label="Dismiss"
                                on:click=move |_| {
                                    runtime.dispatch_action(DesktopAction::DismissAlert { id })
                                }
                            >
                                "×"
                            </button>
                        </div>
                    }
                }}
            </For>
        </section>
    }
}
