//! `fetch`-backed JSON requests against the platform backend.
//!
//! Backend responses are wrapped as `{ "code": ..., "data": ... }`; only `data` is handed to the
//! adapters. Envelope decoding is target-independent so it can be tested natively.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extracts and decodes the `data` member of a backend response body.
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: Value) -> Result<T, String> {
    let Value::Object(mut envelope) = body else {
        return Err("response body is not a JSON object".to_string());
    };
    let data = envelope.remove("data").unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|err| format!("unexpected response data: {err}"))
}

/// Issues a credentialed `GET` for `url` and returns the decoded `data` member.
pub(crate) async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let body = imp::get_body(url).await?;
    decode_envelope(body)
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use serde_json::Value;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{RequestCredentials, RequestInit, Response};

    fn js_error(context: &str, err: JsValue) -> String {
        format!("{context}: {err:?}")
    }

    pub(super) async fn get_body(url: &str) -> Result<Value, String> {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_credentials(RequestCredentials::SameOrigin);

        let response = JsFuture::from(window.fetch_with_str_and_init(url, &init))
            .await
            .map_err(|err| js_error("fetch failed", err))?;
        let response: Response = response
            .dyn_into()
            .map_err(|err| js_error("fetch returned a non-response", err))?;
        if !response.ok() {
            return Err(format!("{url} responded with status {}", response.status()));
        }

        let json = response
            .json()
            .map_err(|err| js_error("response body unavailable", err))?;
        let json = JsFuture::from(json)
            .await
            .map_err(|err| js_error("response body is not JSON", err))?;
        serde_wasm_bindgen::from_value(json).map_err(|err| err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use serde_json::Value;

    pub(super) async fn get_body(url: &str) -> Result<Value, String> {
        Err(format!("fetch is unavailable outside the browser ({url})"))
    }
}

#[cfg(test)]
mod tests {
    use platform_host::InstalledAppRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unwraps_data_member() {
        let records: Vec<InstalledAppRecord> = decode_envelope(json!({
            "code": 200,
            "data": [{
                "key": "system-costcenter",
                "name": "Cost Center",
                "type": "iframe",
                "displayType": "normal",
                "data": { "url": "https://costcenter.example:443", "desc": "billing" }
            }]
        }))
        .expect("decode");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "system-costcenter");
        assert_eq!(records[0].data.url, "https://costcenter.example:443");
    }

    #[test]
    fn missing_data_decodes_as_null() {
        let latest: Option<platform_host::GlobalNotificationRecord> =
            decode_envelope(json!({ "code": 200 })).expect("decode");
        assert_eq!(latest, None);
    }

    #[test]
    fn rejects_non_object_bodies() {
        let err = decode_envelope::<Vec<InstalledAppRecord>>(json!([1, 2])).unwrap_err();
        assert!(err.contains("not a JSON object"));
    }

    #[test]
    fn native_fetch_reports_unavailable() {
        let err = futures::executor::block_on(get_json::<Value>("/api/x")).unwrap_err();
        assert!(err.contains("/api/x"));
    }
}
