use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShellConfigFile {
    schema_version: u32,
    title: String,
    logo: String,
    inventory_endpoint: String,
    notification_endpoint: String,
    notification_poll_interval_ms: u32,
    pending_message_ttl_ms: u32,
    pending_sweep_interval_ms: u32,
    default_language: String,
    notification_marker_key: String,
    cost_center_app_key: String,
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("shell.config.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let config: ShellConfigFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if config.schema_version != SCHEMA_VERSION {
        panic!(
            "shell config schema mismatch in {}: expected {SCHEMA_VERSION} found {}",
            path.display(),
            config.schema_version
        );
    }
    for (name, value) in [
        ("inventory_endpoint", &config.inventory_endpoint),
        ("notification_endpoint", &config.notification_endpoint),
        ("notification_marker_key", &config.notification_marker_key),
    ] {
        if value.trim().is_empty() {
            panic!("shell config field `{name}` must not be empty");
        }
    }
    if config.pending_sweep_interval_ms == 0 || config.notification_poll_interval_ms == 0 {
        panic!("shell config intervals must be positive");
    }

    let json = serde_json::to_string_pretty(&config).expect("serialize shell config");
    let generated = format!(
        "/// Build-time generated shell configuration JSON.\n\
pub const SHELL_CONFIG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("shell_config_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
