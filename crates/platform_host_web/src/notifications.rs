//! Browser notification adapters: Web Notifications delivery and the backend notification feed.

use platform_host::{
    GlobalNotificationRecord, HostAlert, NotificationFeed, NotificationFeedFuture,
    NotificationFuture, NotificationService,
};

use crate::http;

fn rendered_text(alert: &HostAlert) -> String {
    match alert.body.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() => format!("{}: {body}", alert.title),
        _ => alert.title.clone(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Browser notification adapter backed by the Web Notifications API.
///
/// This is a secondary channel next to the shell's in-page alerts. It never prompts for
/// permission and stays silent unless the user has already granted it.
pub struct WebNotificationService;

impl NotificationService for WebNotificationService {
    fn notify<'a>(&'a self, alert: &'a HostAlert) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let rendered = rendered_text(alert);

            #[cfg(target_arch = "wasm32")]
            {
                use wasm_bindgen::JsValue;
                use web_sys::NotificationPermission;

                let supported = web_sys::window()
                    .and_then(|window| {
                        js_sys::Reflect::get(&window, &JsValue::from_str("Notification")).ok()
                    })
                    .is_some_and(|api| !api.is_undefined());
                if !supported
                    || web_sys::Notification::permission() != NotificationPermission::Granted
                {
                    return Ok(());
                }
                return web_sys::Notification::new(&rendered)
                    .map(|_| ())
                    .map_err(|err: JsValue| format!("notification dispatch failed: {err:?}"));
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = rendered;
                Ok(())
            }
        })
    }
}

#[derive(Debug, Clone)]
/// Notification feed polling the backend's latest global notification.
pub struct WebNotificationFeed {
    endpoint: String,
}

impl WebNotificationFeed {
    /// Creates a feed reading from `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl NotificationFeed for WebNotificationFeed {
    fn fetch_latest(
        &self,
    ) -> NotificationFeedFuture<'_, Result<Option<GlobalNotificationRecord>, String>> {
        Box::pin(async move { http::get_json(&self.endpoint).await })
    }
}

#[cfg(test)]
mod tests {
    use platform_host::AlertLevel;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn body_is_appended_only_when_present() {
        let mut alert = HostAlert::info("Maintenance tonight");
        assert_eq!(rendered_text(&alert), "Maintenance tonight");

        alert.body = Some("  ".to_string());
        assert_eq!(rendered_text(&alert), "Maintenance tonight");

        alert.body = Some("22:00 UTC".to_string());
        alert.level = AlertLevel::Warning;
        assert_eq!(rendered_text(&alert), "Maintenance tonight: 22:00 UTC");
    }
}
