//! Cross-frame message transport contract.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of a single post attempt.
pub enum FrameDelivery {
    /// The payload was handed to the frame's content window.
    Delivered,
    /// No frame element with the requested id exists in the document.
    FrameMissing,
}

#[derive(Debug, Clone, PartialEq)]
/// A `message` event received by the shell window.
pub struct InboundFrameMessage {
    /// Origin reported by the browser for the sender.
    pub origin: String,
    /// Structured-clone body, converted to JSON.
    pub body: Value,
}

/// Callback invoked for every inbound message.
pub type InboundHandler = Box<dyn Fn(InboundFrameMessage)>;

/// Guard for an installed inbound listener; dropping it removes the listener.
pub struct FrameListener {
    release: Option<Box<dyn FnOnce()>>,
}

impl FrameListener {
    /// Wraps a release action that runs exactly once.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Guard with nothing to release.
    pub fn inert() -> Self {
        Self { release: None }
    }
}

impl Drop for FrameListener {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for FrameListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameListener")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Host service that posts structured payloads into embedded frames and listens for replies.
///
/// Implementations must pass `target_origin` through unchanged so the browser drops the message
/// if the frame has navigated to another origin.
pub trait FrameTransport {
    /// Posts `payload` to the frame element identified by `frame_dom_id`.
    fn post_to_frame(
        &self,
        frame_dom_id: &str,
        payload: &Value,
        target_origin: &str,
    ) -> Result<FrameDelivery, String>;

    /// Installs `handler` for inbound window messages until the returned guard is dropped.
    fn listen(&self, handler: InboundHandler) -> FrameListener;
}

#[derive(Debug, Clone, Copy, Default)]
/// Transport for targets without a document; every frame is missing.
pub struct NoopFrameTransport;

impl FrameTransport for NoopFrameTransport {
    fn post_to_frame(
        &self,
        _frame_dom_id: &str,
        _payload: &Value,
        _target_origin: &str,
    ) -> Result<FrameDelivery, String> {
        Ok(FrameDelivery::FrameMissing)
    }

    fn listen(&self, _handler: InboundHandler) -> FrameListener {
        FrameListener::inert()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One message accepted by [`RecordingFrameTransport`].
pub struct PostedFrameMessage {
    /// Target frame element id.
    pub frame_dom_id: String,
    /// Posted payload.
    pub payload: Value,
    /// Origin restriction passed to the browser.
    pub target_origin: String,
}

type ListenerSlots = Rc<RefCell<Vec<(u64, Rc<dyn Fn(InboundFrameMessage)>)>>>;

#[derive(Clone, Default)]
/// In-memory transport with an explicit set of mounted frame ids.
pub struct RecordingFrameTransport {
    mounted: Rc<RefCell<BTreeSet<String>>>,
    posted: Rc<RefCell<Vec<PostedFrameMessage>>>,
    listeners: ListenerSlots,
    next_listener: Rc<RefCell<u64>>,
}

impl std::fmt::Debug for RecordingFrameTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingFrameTransport")
            .field("mounted", &self.mounted.borrow())
            .field("posted", &self.posted.borrow().len())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl RecordingFrameTransport {
    /// Marks a frame element as present in the document.
    pub fn mount(&self, frame_dom_id: impl Into<String>) {
        self.mounted.borrow_mut().insert(frame_dom_id.into());
    }

    /// Removes a frame element from the document.
    pub fn unmount(&self, frame_dom_id: &str) {
        self.mounted.borrow_mut().remove(frame_dom_id);
    }

    /// Returns every accepted message, oldest first.
    pub fn posted(&self) -> Vec<PostedFrameMessage> {
        self.posted.borrow().clone()
    }

    /// Number of installed inbound listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Simulates a window `message` event from `origin`.
    pub fn deliver_inbound(&self, origin: impl Into<String>, body: Value) {
        let message = InboundFrameMessage {
            origin: origin.into(),
            body,
        };
        // Handlers may install or drop listeners, so call them on a snapshot.
        let handlers: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(message.clone());
        }
    }
}

impl FrameTransport for RecordingFrameTransport {
    fn post_to_frame(
        &self,
        frame_dom_id: &str,
        payload: &Value,
        target_origin: &str,
    ) -> Result<FrameDelivery, String> {
        if !self.mounted.borrow().contains(frame_dom_id) {
            return Ok(FrameDelivery::FrameMissing);
        }
        self.posted.borrow_mut().push(PostedFrameMessage {
            frame_dom_id: frame_dom_id.to_string(),
            payload: payload.clone(),
            target_origin: target_origin.to_string(),
        });
        Ok(FrameDelivery::Delivered)
    }

    fn listen(&self, handler: InboundHandler) -> FrameListener {
        let id = {
            let mut next = self.next_listener.borrow_mut();
            *next += 1;
            *next
        };
        self.listeners.borrow_mut().push((id, Rc::from(handler)));
        let listeners = Rc::downgrade(&self.listeners);
        FrameListener::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(slot, _)| *slot != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn recording_transport_only_accepts_mounted_frames() {
        let transport = RecordingFrameTransport::default();
        let payload = json!({ "tab": "logs" });

        assert_eq!(
            transport.post_to_frame("app-window-a", &payload, "https://a.example"),
            Ok(FrameDelivery::FrameMissing)
        );

        transport.mount("app-window-a");
        assert_eq!(
            transport.post_to_frame("app-window-a", &payload, "https://a.example"),
            Ok(FrameDelivery::Delivered)
        );
        assert_eq!(transport.posted().len(), 1);
        assert_eq!(transport.posted()[0].target_origin, "https://a.example");
    }

    #[test]
    fn dropping_listener_guard_stops_delivery() {
        let transport = RecordingFrameTransport::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let guard = transport.listen(Box::new(move |message| {
            sink.borrow_mut().push(message.origin);
        }));

        transport.deliver_inbound("https://a.example", json!({ "command": "x" }));
        assert_eq!(transport.listener_count(), 1);

        drop(guard);
        transport.deliver_inbound("https://b.example", json!({ "command": "x" }));
        assert_eq!(transport.listener_count(), 0);
        assert_eq!(*seen.borrow(), vec!["https://a.example".to_string()]);
    }
}
