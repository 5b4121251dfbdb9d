//! Small DOM queries used by the effect handlers. Native builds have no document.

pub(super) fn shell_origin() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

/// Moves keyboard focus into the frame element `dom_id`.
pub(super) fn focus_frame(dom_id: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let Some(element) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(dom_id))
        else {
            return;
        };
        if let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() {
            if let Err(err) = element.focus() {
                leptos::logging::warn!("focus frame `{dom_id}` failed: {err:?}");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = dom_id;
    }
}
