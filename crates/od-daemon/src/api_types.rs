//! Response types for od-daemon HTTP endpoints that are not plain orders.
//!
//! Order endpoints send `od_schemas::Order` (or a list of them) directly.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    /// Number of orders currently held.
    pub orders: usize,
}
