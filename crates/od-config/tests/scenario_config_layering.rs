//! Scenario: layered config
//!
//! GREEN when:
//! - defaults alone produce a valid config with the documented values
//! - overlays override only the keys they name
//! - unknown keys and out-of-range values are rejected
//! - the hash is stable across key order and changes with content

use std::io::Write;

use od_config::{
    load_layered_yaml, load_layered_yaml_from_strings, DaemonConfig, DecodeErrorStatus,
    UpdateMissingPolicy, DEFAULT_BUS_CAPACITY,
};

#[test]
fn defaults_match_documented_values() {
    let cfg = DaemonConfig::defaults().unwrap();

    assert_eq!(cfg.server.bind_addr.to_string(), "127.0.0.1:8081");
    assert!(cfg.store.seed_fixtures);
    assert_eq!(cfg.api.decode_error_status, DecodeErrorStatus::BadRequest);
    assert_eq!(cfg.api.update_missing, UpdateMissingPolicy::Ignore);
    assert_eq!(cfg.events.bus_capacity, DEFAULT_BUS_CAPACITY);
    assert_eq!(DEFAULT_BUS_CAPACITY, 1024);
    assert_eq!(cfg.events.heartbeat_secs, 5);
    assert_eq!(cfg.logging.filter, "info");
    assert!(cfg
        .server
        .cors_origins
        .iter()
        .any(|o| o == "http://localhost:3000"));
}

#[test]
fn overlay_overrides_only_named_keys() {
    let overlay = r#"
api:
  decode_error_status: 500
  update_missing: "not_found"
"#;
    let loaded = load_layered_yaml_from_strings(&[overlay]).unwrap();
    let cfg = loaded.config;

    assert_eq!(
        cfg.api.decode_error_status,
        DecodeErrorStatus::InternalServerError
    );
    assert_eq!(cfg.api.update_missing, UpdateMissingPolicy::NotFound);
    // untouched sections keep their defaults
    assert_eq!(cfg.server.bind_addr.to_string(), "127.0.0.1:8081");
    assert!(cfg.store.seed_fixtures);
}

#[test]
fn later_layers_win() {
    let a = "server:\n  bind_addr: \"0.0.0.0:9000\"\n";
    let b = "server:\n  bind_addr: \"127.0.0.1:9001\"\n";
    let cfg = load_layered_yaml_from_strings(&[a, b]).unwrap().config;
    assert_eq!(cfg.server.bind_addr.to_string(), "127.0.0.1:9001");
}

#[test]
fn empty_layer_is_a_noop() {
    let base = load_layered_yaml_from_strings(&[]).unwrap();
    let with_empty = load_layered_yaml_from_strings(&["# nothing here\n"]).unwrap();
    assert_eq!(base.config_hash, with_empty.config_hash);
}

#[test]
fn unknown_key_is_rejected() {
    let overlay = "store:\n  seed_fixtures: false\n  persist_path: \"/tmp/orders\"\n";
    let err = load_layered_yaml_from_strings(&[overlay]).unwrap_err();
    assert!(
        format!("{err:#}").contains("CONFIG_SCHEMA"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn unsupported_decode_status_is_rejected() {
    let overlay = "api:\n  decode_error_status: 422\n";
    let err = load_layered_yaml_from_strings(&[overlay]).unwrap_err();
    assert!(format!("{err:#}").contains("400 or 500"), "got: {err:#}");
}

#[test]
fn bus_capacity_overlay_replaces_fallback() {
    let cfg = load_layered_yaml_from_strings(&["events:\n  bus_capacity: 16\n"])
        .unwrap()
        .config;
    assert_eq!(cfg.events.bus_capacity, 16);
    assert_eq!(cfg.events.heartbeat_secs, 5);
}

#[test]
fn zero_bus_capacity_is_rejected() {
    let overlay = "events:\n  bus_capacity: 0\n";
    let err = load_layered_yaml_from_strings(&[overlay]).unwrap_err();
    assert!(format!("{err:#}").contains("bus_capacity"));
}

#[test]
fn invalid_yaml_is_rejected() {
    let err = load_layered_yaml_from_strings(&["server: [unclosed"]).unwrap_err();
    assert!(format!("{err:#}").contains("invalid yaml"));
}

#[test]
fn hash_is_stable_across_key_order() {
    let a = "api:\n  update_missing: \"not_found\"\n  decode_error_status: 500\n";
    let b = "api:\n  decode_error_status: 500\n  update_missing: \"not_found\"\n";

    let ha = load_layered_yaml_from_strings(&[a]).unwrap();
    let hb = load_layered_yaml_from_strings(&[b]).unwrap();
    assert_eq!(ha.config_hash, hb.config_hash);
    assert_eq!(ha.canonical_json, hb.canonical_json);
    assert_eq!(ha.config_hash.len(), 64);
}

#[test]
fn hash_changes_with_content() {
    let base = load_layered_yaml_from_strings(&[]).unwrap();
    let changed = load_layered_yaml_from_strings(&["store:\n  seed_fixtures: false\n"]).unwrap();
    assert_ne!(base.config_hash, changed.config_hash);
}

#[test]
fn load_from_files_layers_in_order() {
    let mut f1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(f1, "events:\n  heartbeat_secs: 0").unwrap();
    let mut f2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(f2, "logging:\n  filter: \"debug\"").unwrap();

    let cfg = load_layered_yaml(&[f1.path(), f2.path()]).unwrap().config;
    assert_eq!(cfg.events.heartbeat_secs, 0);
    assert_eq!(cfg.logging.filter, "debug");
}

#[test]
fn missing_file_reports_path() {
    let err = load_layered_yaml(&["/definitely/not/here.yaml"]).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
}

#[test]
fn shipped_example_config_loads() {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../config/od-daemon.example.yaml"
    );
    let cfg = load_layered_yaml(&[path]).unwrap().config;
    assert_eq!(
        cfg.api.decode_error_status,
        DecodeErrorStatus::InternalServerError
    );
    assert_eq!(cfg.events.heartbeat_secs, 10);
}
