//! od-daemon entry point.
//!
//! This file is intentionally thin: it loads config, sets up tracing, builds
//! the shared state, wires middleware, and starts the HTTP server.  All route
//! handlers live in `routes.rs`; all shared state types live in `state.rs`.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use od_daemon::{routes, state};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(name = "od-daemon", version, about = "In-memory order desk HTTP daemon")]
struct Args {
    /// YAML config layer; repeatable, applied in order over the built-in defaults.
    #[arg(long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,

    /// Listen address. Overrides `server.bind_addr`.
    #[arg(long, env = "OD_DAEMON_ADDR", value_name = "HOST:PORT")]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    let args = Args::parse();

    let loaded =
        od_config::load_layered_yaml(args.config.as_slice()).context("config load failed")?;
    let cfg = loaded.config;

    init_tracing(&cfg.logging.filter);

    let shared = Arc::new(state::AppState::from_config(&cfg));

    if cfg.events.heartbeat_secs > 0 {
        state::spawn_heartbeat(
            shared.bus.clone(),
            Duration::from_secs(cfg.events.heartbeat_secs),
        );
    }

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_from_origins(&cfg.server.cors_origins));

    let addr = args.addr.unwrap_or(cfg.server.bind_addr);
    let seeded = shared.store.read().await.len();
    info!(
        config_hash = %loaded.config_hash,
        orders = seeded,
        "od-daemon listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server crashed")?;

    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

/// CORS: allow only the configured origins.
fn cors_from_origins(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(tower_http::cors::Any)
}
