use super::*;
use crate::{
    model::{AppKey, Application, CatalogStatus, LaunchTrigger},
    reducer::DesktopAction,
};

const LANGUAGES: [(&str, &str); 2] = [("en", "English"), ("zh", "中文")];

#[component]
pub(super) fn LauncherSidebar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let logo = runtime.host.get_value().config().logo.clone();
    let title = runtime.host.get_value().config().title.clone();
    let header_logo = logo.clone();

    let apps = Signal::derive(move || {
        state.with(|desktop| {
            desktop
                .registry
                .launcher_apps()
                .cloned()
                .collect::<Vec<Application>>()
        })
    });
    let language = Signal::derive(move || state.with(|desktop| desktop.language.clone()));
    let user_name = Signal::derive(move || {
        state.with(|desktop| desktop.session.display_name.clone().unwrap_or_default())
    });

    let open_app = move |app_key: AppKey| {
        log_ui_error(
            "launch",
            runtime.launch(LaunchTrigger::LocalClick { app_key }),
        );
    };
    let open_cost_center = move |_| {
        let app_key = AppKey::new(runtime.host.get_value().config().cost_center_app_key.clone());
        // Workspaces without billing have no cost center installed.
        if state.with_untracked(|desktop| desktop.registry.find(&app_key).is_some()) {
            open_app(app_key);
        }
    };

    view! {
        <aside class="launcher">
            <header class="launcher-header">
                <img class="launcher-logo" src=header_logo alt="" />
                <span class="launcher-title">{title}</span>
                <button
                    class="launcher-toggle"
                    aria-label="Toggle sidebar"
                    on:click=move |_| runtime.dispatch_action(DesktopAction::ToggleSidebar)
                >
                    {move || if state.with(|desktop| desktop.sidebar_open) { "«" } else { "»" }}
                </button>
            </header>
            <Show
                when=move || {
                    state.with(|desktop| matches!(desktop.catalog, CatalogStatus::Unavailable(_)))
                }
                fallback=|| ()
            >
                <div class="launcher-catalog-error" role="alert">
                    <span>"Applications could not be loaded."</span>
                    <button on:click=move |_| runtime.dispatch_action(DesktopAction::RefreshRegistry)>
                        "Retry"
                    </button>
                </div>
            </Show>
            <nav class="launcher-apps" aria-label="Applications">
                <For each=move || apps.get() key=|app| app.key.clone() let:app>
                    {{
                        let app_key = app.key.clone();
                        let running_key = app.key.clone();
                        let name_key = app.key.clone();
                        let icon = app.icon.clone().unwrap_or_else(|| logo.clone());
                        let name_class = app.name_color.clone().unwrap_or_default();
                        view! {
                            <button
                                class="launcher-app"
                                class:running=move || {
                                    state.with(|desktop| desktop.process_for_app(&running_key).is_some())
                                }
                                title=app.description.clone().unwrap_or_default()
                                on:click=move |_| open_app(app_key.clone())
                            >
                                <img class="launcher-app-icon" src=icon alt="" />
                                <span class=format!("launcher-app-name {name_class}")>
                                    {move || {
                                        state.with(|desktop| {
                                            desktop
                                                .registry
                                                .find(&name_key)
                                                .map(|app| app.display_name(&language.get()).to_string())
                                                .unwrap_or_default()
                                        })
                                    }}
                                </span>
                            </button>
                        }
                    }}
                </For>
            </nav>
            <RunningProcesses />
            <footer class="launcher-account">
                <span class="launcher-user">{move || user_name.get()}</span>
                <button class="launcher-balance" on:click=open_cost_center>
                    "Balance"
                </button>
                <select
                    class="launcher-language"
                    aria-label="Language"
                    on:change=move |ev| {
                        runtime.dispatch_action(DesktopAction::SetLanguage {
                            language: event_target_value(&ev),
                        })
                    }
                >
                    {LANGUAGES
                        .into_iter()
                        .map(|(tag, label)| {
                            view! {
                                <option value=tag selected=move || language.get() == tag>
                                    {label}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button
                    class="launcher-sign-out"
                    on:click=move |_| runtime.dispatch_action(DesktopAction::SignOut)
                >
                    "Sign out"
                </button>
            </footer>
        </aside>
    }
}

#[component]
fn RunningProcesses() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    view! {
        <ul class="launcher-running" aria-label="Running applications">
            <For each=move || state.with(mount_order) key=|pid| *pid let:pid>
                {{
                    let label = move || {
                        state.with(|desktop| {
                            desktop
                                .process(pid)
                                .and_then(|process| desktop.registry.find(&process.app_key))
                                .map(|app| app.display_name(&desktop.language).to_string())
                                .unwrap_or_default()
                        })
                    };
                    view! {
                        <li
                            class="launcher-running-entry"
                            class:foreground=move || {
                                state.with(|desktop| desktop.foreground_pid() == Some(pid))
                            }
                        >
                            <button on:click=move |_| log_ui_error("raise", runtime.raise(pid))>
                                {label}
                            </button>
                            <button
                                class="launcher-running-close"
                                aria-label="Close"
                                on:click=move |_| log_ui_error("terminate", runtime.terminate(pid))
                            >
                                "×"
                            </button>
                        </li>
                    }
                }}
            </For>
        </ul>
    }
}
