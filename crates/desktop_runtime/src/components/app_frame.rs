use desktop_app_contract::WindowSize;

use super::*;
use crate::reducer::DesktopAction;

#[derive(Debug, Clone, PartialEq)]
struct FrameView {
    dom_id: String,
    src: String,
    title: String,
    size: WindowSize,
    z_index: usize,
    foreground: bool,
}

fn frame_view(desktop: &DesktopState, pid: Pid) -> Option<FrameView> {
    let process = desktop.process(pid)?;
    let app = desktop.registry.find(&process.app_key)?;
    Some(FrameView {
        dom_id: process.frame_dom_id(),
        src: app.frame_src(&process.launch),
        title: app.display_name(&desktop.language).to_string(),
        size: process.launch.size,
        z_index: desktop.z_index(pid).unwrap_or_default(),
        foreground: desktop.foreground_pid() == Some(pid),
    })
}

#[component]
pub(super) fn AppFrame(pid: Pid) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let frame = create_memo(move |_| state.with(|desktop| frame_view(desktop, pid)));
    let app_key = move || {
        state.with_untracked(|desktop| desktop.process(pid).map(|p| p.app_key.clone()))
    };

    let raise = move |_| {
        if !frame.with_untracked(|view| view.as_ref().is_some_and(|view| view.foreground)) {
            log_ui_error("raise", runtime.raise(pid));
        }
    };
    let close = move |_| log_ui_error("terminate", runtime.terminate(pid));
    let loaded = move |_| {
        if let Some(app_key) = app_key() {
            runtime.dispatch_action(DesktopAction::FrameReady { app_key });
        }
    };

    // The element itself must stay mounted while the pid lives; only attributes react.
    let Some(dom_id) = frame.with_untracked(|view| view.as_ref().map(|view| view.dom_id.clone()))
    else {
        return ().into_view();
    };

    view! {
        <section
            class="app-window"
            class:foreground=move || frame.with(|view| view.as_ref().is_some_and(|v| v.foreground))
            class:minimized=move || {
                frame.with(|view| view.as_ref().is_some_and(|v| v.size == WindowSize::Minimize))
            }
            class:restored=move || {
                frame.with(|view| view.as_ref().is_some_and(|v| v.size == WindowSize::Maxmin))
            }
            style=move || {
                format!(
                    "z-index:{};",
                    frame.with(|view| view.as_ref().map(|v| v.z_index).unwrap_or_default())
                )
            }
            on:pointerdown=raise
        >
            <header class="app-window-titlebar">
                <span class="app-window-title">
                    {move || frame.with(|view| view.as_ref().map(|v| v.title.clone()).unwrap_or_default())}
                </span>
                <button class="app-window-close" aria-label="Close" on:click=close>
                    "×"
                </button>
            </header>
            <iframe
                id=dom_id
                class="app-window-frame"
                src=move || frame.with(|view| view.as_ref().map(|v| v.src.clone()).unwrap_or_default())
                allow="camera; microphone; clipboard-read; clipboard-write"
                on:load=loaded
            />
        </section>
    }
    .into_view()
}

#[cfg(test)]
mod tests {
    use platform_host::{InstalledAppRecord, SessionSnapshot};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::{AppKey, LaunchRequest},
        reducer::reduce_desktop,
        registry::ApplicationRegistry,
    };

    #[test]
    fn only_the_tail_process_is_foreground() {
        let (registry, _) = ApplicationRegistry::from_records(vec![
            InstalledAppRecord::iframe("a", "A", "https://a.example/app"),
            InstalledAppRecord::iframe("b", "B", "https://b.example"),
        ]);
        let mut desktop = DesktopState::default();
        for action in [
            DesktopAction::HydrateRegistry { registry },
            DesktopAction::SetSession(SessionSnapshot::signed_in("ada")),
            DesktopAction::Launch(LaunchRequest::new(AppKey::new("a"))),
            DesktopAction::Launch(LaunchRequest::new(AppKey::new("b"))),
        ] {
            reduce_desktop(&mut desktop, action).expect("action");
        }

        let a = frame_view(&desktop, Pid(1)).expect("a");
        let b = frame_view(&desktop, Pid(2)).expect("b");
        assert_eq!(a.dom_id, "app-window-a");
        assert_eq!(a.src, "https://a.example/app/");
        assert!(!a.foreground);
        assert!(b.foreground);
        assert!(b.z_index > a.z_index);
        assert_eq!(frame_view(&desktop, Pid(9)), None);
    }
}
