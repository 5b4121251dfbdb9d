//! `postMessage` frame transport and the shell window's `message` listener.

use platform_host::{FrameDelivery, FrameListener, FrameTransport, InboundHandler};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
/// Frame transport backed by `HTMLIFrameElement.contentWindow.postMessage`.
pub struct WebFrameTransport;

#[cfg(target_arch = "wasm32")]
mod imp {
    use platform_host::{FrameDelivery, FrameListener, InboundFrameMessage, InboundHandler};
    use serde::Serialize;
    use serde_json::Value;
    use wasm_bindgen::{closure::Closure, JsCast};
    use web_sys::{HtmlIFrameElement, MessageEvent};

    pub(super) fn post_to_frame(
        frame_dom_id: &str,
        payload: &Value,
        target_origin: &str,
    ) -> Result<FrameDelivery, String> {
        let Some(element) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(frame_dom_id))
        else {
            return Ok(FrameDelivery::FrameMissing);
        };
        let Ok(frame) = element.dyn_into::<HtmlIFrameElement>() else {
            return Err(format!("#{frame_dom_id} is not an iframe"));
        };
        // Detached frames have no browsing context yet.
        let Some(content) = frame.content_window() else {
            return Ok(FrameDelivery::FrameMissing);
        };

        let message = payload
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| format!("payload conversion failed: {err}"))?;
        content
            .post_message(&message, target_origin)
            .map(|()| FrameDelivery::Delivered)
            .map_err(|err| format!("postMessage failed: {err:?}"))
    }

    pub(super) fn listen(handler: InboundHandler) -> FrameListener {
        let Some(window) = web_sys::window() else {
            return FrameListener::inert();
        };

        let callback = Closure::<dyn FnMut(MessageEvent)>::wrap(Box::new(move |event| {
            // Bodies that are not representable as JSON (ports, blobs) are not commands.
            let Ok(body) = serde_wasm_bindgen::from_value::<Value>(event.data()) else {
                return;
            };
            handler(InboundFrameMessage {
                origin: event.origin(),
                body,
            });
        }));

        if window
            .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
            .is_err()
        {
            return FrameListener::inert();
        }

        FrameListener::new(move || {
            let _ = window
                .remove_event_listener_with_callback("message", callback.as_ref().unchecked_ref());
            drop(callback);
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use platform_host::{FrameDelivery, FrameListener, InboundHandler};
    use serde_json::Value;

    pub(super) fn post_to_frame(
        _frame_dom_id: &str,
        _payload: &Value,
        _target_origin: &str,
    ) -> Result<FrameDelivery, String> {
        Ok(FrameDelivery::FrameMissing)
    }

    pub(super) fn listen(_handler: InboundHandler) -> FrameListener {
        FrameListener::inert()
    }
}

impl FrameTransport for WebFrameTransport {
    fn post_to_frame(
        &self,
        frame_dom_id: &str,
        payload: &Value,
        target_origin: &str,
    ) -> Result<FrameDelivery, String> {
        imp::post_to_frame(frame_dom_id, payload, target_origin)
    }

    fn listen(&self, handler: InboundHandler) -> FrameListener {
        imp::listen(handler)
    }
}
