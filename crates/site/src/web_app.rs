use desktop_runtime::{DesktopProvider, DesktopShell, ShellConfig};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use platform_host_web::{build_host_services, WebHostConfig};

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();
    let title = ShellConfig::embedded().title;

    view! {
        <Title text=title />
        <Meta name="description" content="Cloud desktop: launch and manage installed applications." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="/*any" view=DesktopEntry />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    let config = ShellConfig::embedded();
    let host_services = build_host_services(&WebHostConfig::new(
        config.inventory_endpoint,
        config.notification_endpoint,
    ));

    view! {
        <DesktopProvider host_services=host_services>
            <DesktopShell />
        </DesktopProvider>
    }
}
