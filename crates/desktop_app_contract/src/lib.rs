//! Shared wire contract between the desktop shell and the applications hosted in its frames.
//!
//! Hosted apps talk to the shell with `postMessage`. Every message in either direction is a
//! [`CommandEnvelope`]: a command name plus a JSON `data` payload. The shell recognises a small set
//! of inbound commands ([`OPEN_DESKTOP_APP_COMMAND`], [`FRAME_READY_COMMAND`]); everything else is
//! routed by name to whatever handler the shell registered.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;

use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;

/// Inbound command asking the shell to open (or focus) an application.
pub const OPEN_DESKTOP_APP_COMMAND: &str = "openDesktopApp";

/// Inbound command a hosted app posts once its message listener is installed.
pub const FRAME_READY_COMMAND: &str = "frameReady";

const FRAME_DOM_ID_PREFIX: &str = "app-window-";

/// Returns the DOM id of the frame element hosting `app_key`.
///
/// The id is derived only from the key, so at most one frame per application can exist.
pub fn frame_dom_id(app_key: &str) -> String {
    format!("{FRAME_DOM_ID_PREFIX}{app_key}")
}

/// Returns the application key encoded in a frame DOM id produced by [`frame_dom_id`].
pub fn app_key_from_frame_dom_id(dom_id: &str) -> Option<&str> {
    dom_id
        .strip_prefix(FRAME_DOM_ID_PREFIX)
        .filter(|key| !key.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Window sizing requested for a launched application.
pub enum WindowSize {
    #[default]
    /// Fill the whole desktop area.
    Maximize,
    /// Restored (non-maximized) window.
    Maxmin,
    /// Launched minimized.
    Minimize,
}

impl WindowSize {
    /// Returns the wire token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Maximize => "maximize",
            Self::Maxmin => "maxmin",
            Self::Minimize => "minimize",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of the [`OPEN_DESKTOP_APP_COMMAND`] command.
pub struct OpenDesktopAppRequest {
    /// Key of the application to open.
    pub app_key: String,
    /// Query parameters for the frame URL.
    ///
    /// Numbers and booleans are accepted and kept in their JSON text form; `null` entries are
    /// dropped.
    #[serde(default, deserialize_with = "query_values")]
    pub query: BTreeMap<String, String>,
    /// Path inside the application.
    #[serde(default)]
    pub pathname: Option<String>,
    /// Payload forwarded to the application's frame once it can receive messages.
    #[serde(default)]
    pub message_data: Option<Value>,
    /// Requested window size.
    #[serde(default)]
    pub app_size: Option<WindowSize>,
}

impl OpenDesktopAppRequest {
    /// Creates a request for `app_key` with default launch parameters.
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            query: BTreeMap::new(),
            pathname: None,
            message_data: None,
            app_size: None,
        }
    }
}

fn query_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut query = BTreeMap::new();
    for (name, value) in raw {
        let text = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(de::Error::custom(format!(
                    "query parameter `{name}` must be a string, number or boolean"
                )));
            }
        };
        query.insert(name, text);
    }
    Ok(query)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of the [`FRAME_READY_COMMAND`] handshake.
pub struct FrameReadyNotice {
    /// Key of the application whose frame finished loading.
    pub app_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Message envelope exchanged between the shell and hosted frames.
pub struct CommandEnvelope {
    /// Command name.
    pub command: String,
    /// Command payload.
    #[serde(default)]
    pub data: Value,
}

impl CommandEnvelope {
    /// Builds an envelope from a command name and a serializable payload.
    ///
    /// # Errors
    ///
    /// Returns an error when `data` cannot be serialized.
    pub fn new<T: Serialize>(command: impl Into<String>, data: &T) -> Result<Self, String> {
        Ok(Self {
            command: command.into(),
            data: serde_json::to_value(data).map_err(|e| e.to_string())?,
        })
    }

    /// Parses an inbound message body; returns `None` for messages that are not envelopes.
    ///
    /// Browsers deliver unrelated `message` events too (extensions, devtools), so a body that does
    /// not decode is ignored rather than reported.
    pub fn from_message(body: &Value) -> Option<Self> {
        let envelope = serde_json::from_value::<Self>(body.clone()).ok()?;
        if envelope.command.trim().is_empty() {
            return None;
        }
        Some(envelope)
    }

    /// Decodes `data` into a typed payload.
    ///
    /// # Errors
    ///
    /// Returns an error naming the command when the payload shape does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| format!("invalid `{}` payload: {e}", self.command))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn frame_dom_id_round_trips_app_key() {
        let dom_id = frame_dom_id("system-terminal");
        assert_eq!(dom_id, "app-window-system-terminal");
        assert_eq!(app_key_from_frame_dom_id(&dom_id), Some("system-terminal"));
        assert_eq!(app_key_from_frame_dom_id("app-window-"), None);
        assert_eq!(app_key_from_frame_dom_id("sidebar"), None);
    }

    #[test]
    fn open_request_fills_defaults() {
        let envelope = CommandEnvelope::from_message(&json!({
            "command": "openDesktopApp",
            "data": { "appKey": "system-costcenter" }
        }))
        .expect("envelope");

        let request: OpenDesktopAppRequest = envelope.decode().expect("decode");
        assert_eq!(request, OpenDesktopAppRequest::new("system-costcenter"));
    }

    #[test]
    fn open_request_carries_message_data_and_size() {
        let envelope = CommandEnvelope::from_message(&json!({
            "command": "openDesktopApp",
            "data": {
                "appKey": "system-dbprovider",
                "pathname": "/db/detail",
                "query": { "name": "pg-1" },
                "messageData": { "type": "InternalAppCall", "name": "pg-1" },
                "appSize": "maxmin"
            }
        }))
        .expect("envelope");

        let request: OpenDesktopAppRequest = envelope.decode().expect("decode");
        assert_eq!(request.pathname.as_deref(), Some("/db/detail"));
        assert_eq!(request.query.get("name").map(String::as_str), Some("pg-1"));
        assert_eq!(request.app_size, Some(WindowSize::Maxmin));
        assert_eq!(
            request.message_data,
            Some(json!({ "type": "InternalAppCall", "name": "pg-1" }))
        );
    }

    #[test]
    fn loosely_typed_query_values_are_stringified() {
        let envelope = CommandEnvelope::from_message(&json!({
            "command": "openDesktopApp",
            "data": {
                "appKey": "system-dbprovider",
                "query": { "page": 2, "ratio": 0.5, "readonly": true, "name": "pg-1", "tab": null }
            }
        }))
        .expect("envelope");

        let request: OpenDesktopAppRequest = envelope.decode().expect("decode");
        assert_eq!(
            request.query,
            BTreeMap::from([
                ("name".to_string(), "pg-1".to_string()),
                ("page".to_string(), "2".to_string()),
                ("ratio".to_string(), "0.5".to_string()),
                ("readonly".to_string(), "true".to_string()),
            ])
        );

        let nested = CommandEnvelope::new(
            OPEN_DESKTOP_APP_COMMAND,
            &json!({ "appKey": "system-dbprovider", "query": { "filter": { "a": 1 } } }),
        )
        .expect("envelope");
        let err = nested
            .decode::<OpenDesktopAppRequest>()
            .expect_err("nested query value");
        assert!(err.contains("filter"));

        let null_query = CommandEnvelope::new(
            OPEN_DESKTOP_APP_COMMAND,
            &json!({ "appKey": "system-dbprovider", "query": null }),
        )
        .expect("envelope");
        let request: OpenDesktopAppRequest = null_query.decode().expect("decode");
        assert!(request.query.is_empty());
    }

    #[test]
    fn unrelated_messages_are_not_envelopes() {
        assert_eq!(CommandEnvelope::from_message(&json!("webpackOk")), None);
        assert_eq!(CommandEnvelope::from_message(&json!({ "command": " " })), None);
        assert_eq!(CommandEnvelope::from_message(&json!({ "source": "devtools" })), None);
    }

    #[test]
    fn decode_error_names_the_command() {
        let envelope = CommandEnvelope::new(OPEN_DESKTOP_APP_COMMAND, &json!({ "query": 3 }))
            .expect("envelope");
        let err = envelope
            .decode::<OpenDesktopAppRequest>()
            .expect_err("missing app key");
        assert!(err.contains("openDesktopApp"));
    }
}
