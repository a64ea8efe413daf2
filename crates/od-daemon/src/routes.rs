//! Axum router and all HTTP handlers for od-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers.  Handlers are `pub(crate)`; the scenario tests in
//! `tests/` go through the router.

use std::{convert::Infallible, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, put},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use od_config::UpdateMissingPolicy;
use od_schemas::Order;
use od_store::StoreError;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use crate::{
    api_types::HealthResponse,
    error::ApiError,
    state::{AppState, BusMsg},
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(stream))
        .route(
            "/orders",
            get(list_orders).post(create_order).put(update_order),
        )
        .route(
            "/orders/",
            get(list_orders).post(create_order).put(update_order),
        )
        .route("/orders/:id", get(get_order))
        // Legacy update paths; same handler as PUT /orders.
        .route("/order/orders", put(update_order))
        .route("/order/orders/", put(update_order))
        .fallback(route_not_found)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// 200 with a JSON body; encoding failure maps to 500.
fn json_ok<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(value).map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        bytes,
    )
        .into_response())
}

/// Decode the first JSON value of a request body as an order, mapping
/// failure per the API policy.
///
/// Bytes after the first value are ignored. A `null` body is an empty order.
fn decode_order(st: &AppState, body: &[u8]) -> Result<Order, ApiError> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Order>>()
        .next();
    let detail = match first {
        Some(Ok(order)) => return Ok(order.unwrap_or_default()),
        Some(Err(e)) => e.to_string(),
        None => "empty body".to_string(),
    };
    warn!(error = %detail, "order body rejected");
    Err(ApiError::Decode {
        status: st.api.decode_error_status,
        detail,
    })
}

pub(crate) async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let orders = st.store.read().await.len();
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
            orders,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_orders(State(st): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let orders = st.store.read().await.list();
    json_ok(&orders)
}

// ---------------------------------------------------------------------------
// GET /orders/:id
// ---------------------------------------------------------------------------

pub(crate) async fn get_order(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let found = st.store.read().await.get(&id).cloned();
    match found {
        Some(order) => json_ok(&order),
        None => {
            debug!(order_id = %id, "get: no such order");
            Err(ApiError::OrderNotFound { id })
        }
    }
}

// ---------------------------------------------------------------------------
// POST /orders
// ---------------------------------------------------------------------------

/// Store the decoded order under its id, overwriting any existing record.
pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let order = decode_order(&st, &body)?;

    let prev = st.store.write().await.upsert(order.clone());
    let replaced = prev.is_some();

    info!(order_id = %order.id, replaced, "orders/create");
    if replaced {
        st.publish(BusMsg::OrderReplaced {
            order: order.clone(),
        });
    } else {
        st.publish(BusMsg::OrderCreated {
            order: order.clone(),
        });
    }
    json_ok(&order)
}

// ---------------------------------------------------------------------------
// PUT /orders  (and legacy PUT /order/orders)
// ---------------------------------------------------------------------------

/// Replace the stored order with the same id. Never creates a record.
///
/// An unknown id is answered per `api.update_missing`: `ignore` echoes the
/// body with 200, `not_found` answers 404.
pub(crate) async fn update_order(
    State(st): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let order = decode_order(&st, &body)?;

    let outcome = st.store.write().await.replace_existing(order.clone());
    match outcome {
        Ok(_) => {
            info!(order_id = %order.id, "orders/update");
            st.publish(BusMsg::OrderUpdated {
                order: order.clone(),
            });
        }
        Err(StoreError::UnknownOrder { id }) => match st.api.update_missing {
            UpdateMissingPolicy::Ignore => {
                debug!(order_id = %id, "orders/update: no match, store unchanged");
            }
            UpdateMissingPolicy::NotFound => {
                debug!(order_id = %id, "orders/update: no match");
                return Err(ApiError::UnknownOrder { id });
            }
        },
    }
    json_ok(&order)
}

// ---------------------------------------------------------------------------
// GET /events  (SSE)
// ---------------------------------------------------------------------------

pub(crate) async fn stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let rx = st.bus.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<BusMsg>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(m) => {
                let data = serde_json::to_string(&m).ok()?;
                Some(Ok(Event::default().event(m.event_name()).data(data)))
            }
            Err(_) => None, // lagged / closed
        }
    })
}
