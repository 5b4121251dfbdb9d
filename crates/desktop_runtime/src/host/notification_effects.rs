use std::time::Duration;

use leptos::{logging, on_cleanup, set_interval_with_handle, spawn_local, SignalWithUntracked};
use platform_host::HostAlert;

use crate::{
    host::DesktopHostContext, reducer::DesktopAction, runtime_context::DesktopRuntimeContext,
};

/// Fetches the feed once and returns the alert to surface if the notification has not been seen.
///
/// The host notification service is an optional second channel; the caller shows the returned
/// alert in the page.
pub(super) async fn poll_once(host: &DesktopHostContext, language: &str) -> Option<HostAlert> {
    let record = match host.services().notification_feed.fetch_latest().await {
        Ok(Some(record)) => record,
        Ok(None) => return None,
        Err(err) => {
            logging::warn!("global notification fetch failed: {err}");
            return None;
        }
    };

    let alert = host.bridge.observe(&record, language)?;
    if let Err(err) = host.services().notifications.notify(&alert).await {
        logging::warn!("global notification delivery failed: {err}");
    }
    Some(alert)
}

pub(super) fn install_polling(host: DesktopHostContext, runtime: DesktopRuntimeContext) {
    let every = Duration::from_millis(u64::from(host.config().notification_poll_interval_ms));
    let poll = move || {
        let host = host.clone();
        let language = runtime.state.with_untracked(|desktop| desktop.language.clone());
        spawn_local(async move {
            if let Some(alert) = poll_once(&host, &language).await {
                logging::log!("surfacing global notification: {}", alert.title);
                runtime.dispatch_action(DesktopAction::ShowAlert(alert));
            }
        });
    };

    // First poll right after boot, then on the interval.
    poll();
    match set_interval_with_handle(poll, every) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => logging::warn!("global notification polling not installed: {err:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::block_on;
    use platform_host::{
        GlobalNotificationRecord, HostServices, MemoryAppInventory, MemoryHost,
        NotificationFuture, NotificationService, PrefsStore,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ShellConfig;

    #[test]
    fn repeated_polls_surface_a_notification_once() {
        let memory = MemoryHost::signed_in(MemoryAppInventory::default());
        let host = DesktopHostContext::new(memory.services(), ShellConfig::default());
        memory
            .notification_feed
            .publish(GlobalNotificationRecord::new("n1", "Maintenance").with_localized("zh", "维护"));

        assert_eq!(
            block_on(poll_once(&host, "zh")),
            Some(HostAlert::info("维护"))
        );
        assert_eq!(block_on(poll_once(&host, "zh")), None);
        assert_eq!(memory.notifications.delivered(), vec![HostAlert::info("维护")]);
        assert_eq!(
            memory.prefs.load_pref("GlobalNotification"),
            Ok(Some("n1".to_string()))
        );
    }

    #[test]
    fn reload_with_persisted_marker_stays_quiet() {
        let memory = MemoryHost::signed_in(MemoryAppInventory::default());
        memory
            .notification_feed
            .publish(GlobalNotificationRecord::new("n1", "Maintenance"));
        let first = DesktopHostContext::new(memory.services(), ShellConfig::default());
        assert!(block_on(poll_once(&first, "en")).is_some());

        let reloaded = DesktopHostContext::new(memory.services(), ShellConfig::default());
        assert_eq!(block_on(poll_once(&reloaded, "en")), None);
        assert_eq!(memory.notifications.delivered().len(), 1);
    }

    /// Notification channel that is unavailable (permission not granted, unsupported browser).
    struct UnavailableNotifications;

    impl NotificationService for UnavailableNotifications {
        fn notify<'a>(
            &'a self,
            _alert: &'a HostAlert,
        ) -> NotificationFuture<'a, Result<(), String>> {
            Box::pin(async { Err("Illegal constructor".to_string()) })
        }
    }

    #[test]
    fn alert_is_returned_when_host_channel_fails() {
        let memory = MemoryHost::signed_in(MemoryAppInventory::default());
        memory
            .notification_feed
            .publish(GlobalNotificationRecord::new("n1", "Maintenance"));
        let services = HostServices {
            notifications: Rc::new(UnavailableNotifications),
            ..memory.services()
        };
        let host = DesktopHostContext::new(services, ShellConfig::default());

        assert_eq!(
            block_on(poll_once(&host, "en")),
            Some(HostAlert::info("Maintenance"))
        );
        assert_eq!(block_on(poll_once(&host, "en")), None);
    }

    #[test]
    fn empty_feed_surfaces_nothing() {
        let memory = MemoryHost::signed_in(MemoryAppInventory::default());
        let host = DesktopHostContext::new(memory.services(), ShellConfig::default());
        assert_eq!(block_on(poll_once(&host, "en")), None);
        assert!(memory.prefs.is_empty());
    }
}
