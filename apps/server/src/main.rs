// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ifc-facets server - view the tessellated faces of an IFC file.
//!
//! Upload an `.ifc` file from the browser; every triangle of every
//! `Tessellation` representation is drawn as a blue, half-transparent
//! plotly mesh3d trace.
//!
//! # Endpoints
//!
//! - `GET /` - Viewer page (upload form and plot)
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/view?mode=strict|tolerant` - Extract faces and build the scene

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::{Config, DEFAULT_LOG_FILTER};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes();
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        // Viewer page
        .route("/", get(routes::page::index))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Face extraction
        .route("/api/v1/view", post(routes::view::view))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        max_file_size_mb = config.max_file_size_mb,
        request_timeout_secs = config.request_timeout_secs,
        error_policy = %config.error_policy,
        apply_placement = config.apply_placement,
        "Starting ifc-facets server"
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;

    let router = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
