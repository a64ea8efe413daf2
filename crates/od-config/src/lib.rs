//! od-config
//!
//! Layered YAML configuration for od-daemon.
//!
//! Layering: the built-in [`DEFAULT_YAML`] document is always the base; each
//! additional document is deep-merged on top in order (later wins). The merged
//! tree is then decoded into [`DaemonConfig`], which rejects unknown keys, and
//! hashed so the running daemon can log exactly which config it booted with.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

/// Broadcast bus capacity when `events.bus_capacity` is not set.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Base layer. Every key the daemon reads has a value here, except
/// `events.bus_capacity`, which falls back to [`DEFAULT_BUS_CAPACITY`].
pub const DEFAULT_YAML: &str = r#"
server:
  bind_addr: "127.0.0.1:8081"
  cors_origins:
    - "http://localhost"
    - "http://127.0.0.1"
    - "http://localhost:3000"
    - "http://127.0.0.1:3000"
    - "http://localhost:5173"
    - "http://127.0.0.1:5173"
store:
  seed_fixtures: true
api:
  decode_error_status: 400
  update_missing: "ignore"
events:
  heartbeat_secs: 5
logging:
  filter: "info"
"#;

// ---------------------------------------------------------------------------
// Typed config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub api: ApiConfig,
    pub events: EventsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Origins allowed by the CORS layer. Empty list = no cross-origin access.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub seed_fixtures: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    pub decode_error_status: DecodeErrorStatus,
    pub update_missing: UpdateMissingPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            decode_error_status: DecodeErrorStatus::BadRequest,
            update_missing: UpdateMissingPolicy::Ignore,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
    /// 0 disables the heartbeat task.
    pub heartbeat_secs: u64,
}

fn default_bus_capacity() -> usize {
    DEFAULT_BUS_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

/// Status code returned when a request body does not decode as an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum DecodeErrorStatus {
    /// 400 Bad Request.
    BadRequest,
    /// 500 Internal Server Error, for clients that expect the legacy code.
    InternalServerError,
}

impl DecodeErrorStatus {
    pub fn as_u16(self) -> u16 {
        match self {
            DecodeErrorStatus::BadRequest => 400,
            DecodeErrorStatus::InternalServerError => 500,
        }
    }
}

impl TryFrom<u16> for DecodeErrorStatus {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            400 => Ok(DecodeErrorStatus::BadRequest),
            500 => Ok(DecodeErrorStatus::InternalServerError),
            other => Err(format!("decode_error_status must be 400 or 500, got {other}")),
        }
    }
}

impl From<DecodeErrorStatus> for u16 {
    fn from(s: DecodeErrorStatus) -> u16 {
        s.as_u16()
    }
}

/// What `PUT` does when no stored order has the incoming id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMissingPolicy {
    /// 200 with the echoed body; store unchanged.
    Ignore,
    /// 404 `order not found`; store unchanged.
    NotFound,
}

impl DaemonConfig {
    /// Config built from [`DEFAULT_YAML`] alone.
    pub fn defaults() -> Result<Self> {
        Ok(load_layered_yaml_from_strings(&[])?.config)
    }

    /// Semantic checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.events.bus_capacity == 0 {
            bail!("CONFIG_INVALID events.bus_capacity must be > 0");
        }
        if self.logging.filter.trim().is_empty() {
            bail!("CONFIG_INVALID logging.filter must not be empty");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// SHA-256 (hex) of `canonical_json`.
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub config: DaemonConfig,
}

/// Read each path and layer it over the defaults.
pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Layer `yaml_docs` over [`DEFAULT_YAML`], decode, validate and hash.
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = yaml_to_json(DEFAULT_YAML).context("built-in defaults")?;
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_json = yaml_to_json(raw).with_context(|| format!("config layer #{}", i + 1))?;
        merged = deep_merge(merged, v_json);
    }

    let config: DaemonConfig = serde_json::from_value(merged.clone())
        .context("CONFIG_SCHEMA merged config does not match the daemon schema")?;
    config.validate()?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
        config,
    })
}

fn yaml_to_json(raw: &str) -> Result<Value> {
    let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
    let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
    // An empty document (or one holding only comments) is a no-op layer.
    Ok(match v_json {
        Value::Null => serde_json::json!({}),
        v => v,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json::Map is BTreeMap-backed (no `preserve_order`), so keys
    // serialize sorted regardless of YAML key order.
    let s = serde_json::to_string(v).context("canonical json serialize failed")?;
    Ok(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
