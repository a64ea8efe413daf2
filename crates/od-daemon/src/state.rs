//! Shared runtime state for od-daemon.
//!
//! All types here are `Clone`-able (via `Arc` or copy). Handlers receive
//! `State<Arc<AppState>>` from Axum; this module owns nothing async itself
//! apart from the heartbeat task.

use std::sync::Arc;
use std::time::Duration;

use od_config::{ApiConfig, DaemonConfig, DEFAULT_BUS_CAPACITY};
use od_schemas::Order;
use od_store::OrderStore;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

// ---------------------------------------------------------------------------
// BusMsg: SSE event bus payload
// ---------------------------------------------------------------------------

/// Messages broadcast over the internal event bus and surfaced as SSE events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusMsg {
    Heartbeat { ts_millis: i64 },
    /// POST stored an order under a previously unused id.
    OrderCreated { order: Order },
    /// POST overwrote an existing id.
    OrderReplaced { order: Order },
    /// PUT matched an existing id.
    OrderUpdated { order: Order },
}

impl BusMsg {
    /// SSE `event:` name; same string as the serde `type` tag.
    pub fn event_name(&self) -> &'static str {
        match self {
            BusMsg::Heartbeat { .. } => "heartbeat",
            BusMsg::OrderCreated { .. } => "order_created",
            BusMsg::OrderReplaced { .. } => "order_replaced",
            BusMsg::OrderUpdated { .. } => "order_updated",
        }
    }
}

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast bus for SSE.
    pub bus: broadcast::Sender<BusMsg>,
    /// Static build metadata.
    pub build: BuildInfo,
    /// The order map. One lock for the whole map: list/get read, create/update write.
    pub store: Arc<RwLock<OrderStore>>,
    /// Error-mapping policy for the order endpoints.
    pub api: ApiConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fixture-seeded store with the default API policy.
    pub fn new() -> Self {
        Self::with_parts(
            OrderStore::with_fixtures(),
            ApiConfig::default(),
            DEFAULT_BUS_CAPACITY,
        )
    }

    pub fn from_config(cfg: &DaemonConfig) -> Self {
        let store = if cfg.store.seed_fixtures {
            OrderStore::with_fixtures()
        } else {
            OrderStore::new()
        };
        Self::with_parts(store, cfg.api.clone(), cfg.events.bus_capacity)
    }

    /// # Panics
    /// If `bus_capacity` is 0 (rejected earlier by `DaemonConfig::validate`).
    pub fn with_parts(store: OrderStore, api: ApiConfig, bus_capacity: usize) -> Self {
        let (bus, _rx) = broadcast::channel::<BusMsg>(bus_capacity);

        Self {
            bus,
            build: BuildInfo {
                service: "od-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            store: Arc::new(RwLock::new(store)),
            api,
        }
    }

    /// Publish on the bus. No subscribers is not an error.
    pub fn publish(&self, msg: BusMsg) {
        let _ = self.bus.send(msg);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn a background task that emits a heartbeat SSE every `interval`.
pub fn spawn_heartbeat(bus: broadcast::Sender<BusMsg>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let ts = chrono::Utc::now().timestamp_millis();
            let _ = bus.send(BusMsg::Heartbeat { ts_millis: ts });
        }
    });
}
