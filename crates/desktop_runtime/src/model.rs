use std::{collections::BTreeMap, fmt};

use desktop_app_contract::{frame_dom_id, OpenDesktopAppRequest, WindowSize};
use platform_host::{HostAlert, SessionSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::registry::ApplicationRegistry;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_PATHNAME: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppKey(String);

impl AppKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// DOM id of the frame element hosting this application.
    pub fn frame_dom_id(&self) -> String {
        frame_dom_id(&self.0)
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pid(pub u64);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayType {
    Normal,
    Hidden,
}

impl DisplayType {
    /// Unknown or missing classifications never reach the launcher.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("normal") => Self::Normal,
            _ => Self::Hidden,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppSource {
    /// Platform-provided (`system-*`).
    System,
    /// Deployed by the user (`user-*`).
    User,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub key: AppKey,
    pub name: String,
    pub localized_names: BTreeMap<String, String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub launch_url: Url,
    pub display_type: DisplayType,
    pub name_color: Option<String>,
    pub help_docs: Option<String>,
}

impl Application {
    /// Serialized origin of the launch URL; the only origin messages to this app may target.
    pub fn origin(&self) -> String {
        self.launch_url.origin().ascii_serialization()
    }

    pub fn source(&self) -> AppSource {
        let key = self.key.as_str();
        if key.starts_with("system-") {
            AppSource::System
        } else if key.starts_with("user-") {
            AppSource::User
        } else {
            AppSource::Other
        }
    }

    pub fn is_listed(&self) -> bool {
        self.display_type == DisplayType::Normal
    }

    /// Localized name for `language`, trying the primary subtag (`zh` for `zh-Hans`) before the
    /// default name.
    pub fn display_name(&self, language: &str) -> &str {
        let primary = language.split(['-', '_']).next().unwrap_or(language);
        [language, primary]
            .into_iter()
            .find_map(|lang| {
                self.localized_names
                    .get(lang)
                    .map(String::as_str)
                    .filter(|name| !name.trim().is_empty())
            })
            .unwrap_or(&self.name)
    }

    /// Navigation target for this app's frame under `params`.
    pub fn frame_src(&self, params: &LaunchParams) -> String {
        let mut url = self.launch_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        let pathname = params.pathname.trim();
        let path = if pathname.starts_with('/') {
            format!("{base}{pathname}")
        } else {
            format!("{base}/{pathname}")
        };
        url.set_path(&path);
        if params.query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params.query.iter());
        }
        url.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchParams {
    pub query: BTreeMap<String, String>,
    pub pathname: String,
    pub size: WindowSize,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            query: BTreeMap::new(),
            pathname: DEFAULT_PATHNAME.to_string(),
            size: WindowSize::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub pid: Pid,
    pub app_key: AppKey,
    pub launch: LaunchParams,
    /// Set once the frame signals it can receive messages; cleared when its frame URL changes.
    pub frame_ready: bool,
}

impl Process {
    pub fn frame_dom_id(&self) -> String {
        self.app_key.frame_dom_id()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryAttempt {
    /// First attempt, made while handling the launch request.
    Initial,
    /// The single retry made when the frame signals readiness.
    AfterReady,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub pid: Pid,
    pub app_key: AppKey,
    pub payload: Value,
    pub attempt: DeliveryAttempt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingMessage {
    pub pid: Pid,
    pub app_key: AppKey,
    pub payload: Value,
    pub target_origin: String,
    pub queued_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    Loading,
    Ready,
    /// Inventory fetch failed; the catalog is empty.
    Unavailable(String),
}

/// Where a launch request came from. Both sources funnel into the same launch path.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchTrigger {
    /// Launcher entry click. Focuses a running instance without touching its parameters.
    LocalClick { app_key: AppKey },
    /// `openDesktopApp` command received through the message router.
    InboundCommand { request: OpenDesktopAppRequest },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub app_key: AppKey,
    /// `None` keeps the parameters of a running instance (defaults for a new one).
    pub params: Option<LaunchParams>,
    pub message: Option<Value>,
}

impl LaunchRequest {
    pub fn new(app_key: AppKey) -> Self {
        Self {
            app_key,
            params: None,
            message: None,
        }
    }

    pub fn with_params(mut self, params: LaunchParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_message(mut self, message: Value) -> Self {
        self.message = Some(message);
        self
    }
}

impl From<LaunchTrigger> for LaunchRequest {
    fn from(trigger: LaunchTrigger) -> Self {
        match trigger {
            LaunchTrigger::LocalClick { app_key } => Self::new(app_key),
            LaunchTrigger::InboundCommand { request } => Self {
                app_key: AppKey::new(request.app_key),
                params: Some(LaunchParams {
                    query: request.query,
                    pathname: request
                        .pathname
                        .filter(|p| !p.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_PATHNAME.to_string()),
                    size: request.app_size.unwrap_or_default(),
                }),
                message: request.message_data,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// In-page alert shown by the shell until the user dismisses it.
pub struct ShellAlert {
    pub id: u64,
    pub alert: HostAlert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub registry: ApplicationRegistry,
    pub catalog: CatalogStatus,
    pub next_pid: u64,
    /// Running processes in stacking order; the last entry is the foreground process.
    pub processes: Vec<Process>,
    pub pending: Vec<PendingMessage>,
    /// Visible in-page alerts, oldest first.
    pub alerts: Vec<ShellAlert>,
    pub next_alert_id: u64,
    pub session: SessionSnapshot,
    pub language: String,
    pub sidebar_open: bool,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            registry: ApplicationRegistry::default(),
            catalog: CatalogStatus::default(),
            next_pid: 1,
            processes: Vec::new(),
            pending: Vec::new(),
            alerts: Vec::new(),
            next_alert_id: 1,
            session: SessionSnapshot::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            sidebar_open: true,
        }
    }
}

impl DesktopState {
    pub fn foreground(&self) -> Option<&Process> {
        self.processes.last()
    }

    pub fn foreground_pid(&self) -> Option<Pid> {
        self.foreground().map(|p| p.pid)
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    pub fn process_for_app(&self, app_key: &AppKey) -> Option<&Process> {
        self.processes.iter().find(|p| &p.app_key == app_key)
    }

    /// Pids in stacking order, bottom first.
    pub fn z_order(&self) -> Vec<Pid> {
        self.processes.iter().map(|p| p.pid).collect()
    }

    /// 1-based stacking position used for CSS `z-index`.
    pub fn z_index(&self, pid: Pid) -> Option<usize> {
        self.processes
            .iter()
            .position(|p| p.pid == pid)
            .map(|idx| idx + 1)
    }

    pub fn pending_for<'a>(
        &'a self,
        app_key: &'a AppKey,
    ) -> impl Iterator<Item = &'a PendingMessage> + 'a {
        self.pending.iter().filter(move |m| &m.app_key == app_key)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn app(url: &str) -> Application {
        Application {
            key: AppKey::new("system-dbprovider"),
            name: "Database".to_string(),
            localized_names: BTreeMap::from([("zh".to_string(), "数据库".to_string())]),
            icon: None,
            description: None,
            launch_url: Url::parse(url).expect("url"),
            display_type: DisplayType::Normal,
            name_color: None,
            help_docs: None,
        }
    }

    #[test]
    fn origin_drops_path_and_default_port() {
        assert_eq!(
            app("https://dbprovider.cloud.example:443/console").origin(),
            "https://dbprovider.cloud.example"
        );
        assert_eq!(
            app("http://127.0.0.1:3000").origin(),
            "http://127.0.0.1:3000"
        );
    }

    #[test]
    fn display_name_falls_back_through_primary_subtag() {
        let app = app("https://db.example");
        assert_eq!(app.display_name("zh"), "数据库");
        assert_eq!(app.display_name("zh-Hans"), "数据库");
        assert_eq!(app.display_name("en"), "Database");
    }

    #[test]
    fn frame_src_joins_pathname_and_sorted_query() {
        let app = app("https://db.example/console/");
        let params = LaunchParams {
            query: BTreeMap::from([
                ("tab".to_string(), "backups".to_string()),
                ("name".to_string(), "pg 1".to_string()),
            ]),
            pathname: "/db/detail".to_string(),
            size: WindowSize::Maximize,
        };
        assert_eq!(
            app.frame_src(&params),
            "https://db.example/console/db/detail?name=pg+1&tab=backups"
        );
        assert_eq!(
            app.frame_src(&LaunchParams::default()),
            "https://db.example/console/"
        );
    }

    #[test]
    fn inbound_trigger_fills_launch_defaults() {
        let mut request = OpenDesktopAppRequest::new("system-terminal");
        request.pathname = Some(String::new());
        request.message_data = Some(json!({ "cmd": "ls" }));

        let launch = LaunchRequest::from(LaunchTrigger::InboundCommand { request });
        assert_eq!(launch.app_key, AppKey::new("system-terminal"));
        assert_eq!(launch.params, Some(LaunchParams::default()));
        assert_eq!(launch.message, Some(json!({ "cmd": "ls" })));
    }

    #[test]
    fn local_click_keeps_running_parameters() {
        let launch = LaunchRequest::from(LaunchTrigger::LocalClick {
            app_key: AppKey::new("system-terminal"),
        });
        assert_eq!(launch.params, None);
        assert_eq!(launch.message, None);
    }

    #[test]
    fn unknown_display_types_are_hidden() {
        assert_eq!(DisplayType::from_wire(Some("normal")), DisplayType::Normal);
        assert_eq!(DisplayType::from_wire(Some("hidden")), DisplayType::Hidden);
        assert_eq!(DisplayType::from_wire(Some("beta")), DisplayType::Hidden);
        assert_eq!(DisplayType::from_wire(None), DisplayType::Hidden);
    }
}
