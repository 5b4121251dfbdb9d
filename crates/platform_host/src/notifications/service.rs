//! Host alert delivery contracts and portable adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`NotificationService`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Severity hint for a host alert.
pub enum AlertLevel {
    #[default]
    /// Informational message that stays until dismissed.
    Info,
    /// Something the user should act on.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A user-visible alert raised by the shell itself (not by a hosted app).
pub struct HostAlert {
    /// Alert headline.
    pub title: String,
    /// Optional secondary text.
    pub body: Option<String>,
    /// Severity hint.
    pub level: AlertLevel,
}

impl HostAlert {
    /// Builds an informational alert with only a title.
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            level: AlertLevel::Info,
        }
    }
}

/// Host service for surfacing shell-level alerts.
pub trait NotificationService {
    /// Surfaces `alert` to the user.
    fn notify<'a>(&'a self, alert: &'a HostAlert) -> NotificationFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op notification service for unsupported targets.
pub struct NoopNotificationService;

impl NotificationService for NoopNotificationService {
    fn notify<'a>(&'a self, _alert: &'a HostAlert) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// Notification service that records every alert in memory.
pub struct RecordingNotificationService {
    delivered: Rc<RefCell<Vec<HostAlert>>>,
}

impl RecordingNotificationService {
    /// Returns all alerts delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<HostAlert> {
        self.delivered.borrow().clone()
    }
}

impl NotificationService for RecordingNotificationService {
    fn notify<'a>(&'a self, alert: &'a HostAlert) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.delivered.borrow_mut().push(alert.clone());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn recording_service_keeps_delivery_order() {
        let service = RecordingNotificationService::default();
        let service_obj: &dyn NotificationService = &service;

        block_on(service_obj.notify(&HostAlert::info("maintenance tonight"))).expect("notify");
        block_on(service_obj.notify(&HostAlert {
            title: "quota".to_string(),
            body: Some("almost full".to_string()),
            level: AlertLevel::Warning,
        }))
        .expect("notify");

        let titles: Vec<_> = service
            .delivered()
            .into_iter()
            .map(|alert| alert.title)
            .collect();
        assert_eq!(titles, vec!["maintenance tonight", "quota"]);
    }
}
