//! Browser entry point: builds the host services and mounts the desktop shell.

mod web_app;

pub use web_app::{DesktopEntry, SiteApp};

/// Mounts [`SiteApp`] into `<body>`.
#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(SiteApp)
}
