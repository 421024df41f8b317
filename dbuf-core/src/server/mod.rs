//! HTTP Query and Admin Surface
//!
//! Serves blocklist lookups and lets an operator reload resources without a
//! restart.  Handlers reach the registry through shared state, never through
//! a global.
//!
//! # Endpoints
//!
//! - `GET /q?id=..&query=..` - 200 `hello, <id>`, or 403 `ERROR` if blocked
//! - `GET /admin/reload?name=..&path=..` - 200 `OK` / 404 / 500 `FAILED`
//! - `GET /admin/status` - JSON status of every registered resource

mod handlers;

pub use handlers::{QueryParams, ReloadParams};

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::blocklist::BlockList;
use crate::config::ServerConfig;
use crate::engine::Registry;

/// Shared application state
pub struct AppState {
    registry: Registry<BlockList>,
}

impl AppState {
    /// Register every configured resource.  Fails on the first one that
    /// does not load.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let registry = Registry::new();
        for spec in &config.resources {
            registry
                .add(spec.name.clone(), &spec.path, BlockList::new)
                .with_context(|| format!("Failed to register resource '{}'", spec.name))?;
        }
        Ok(Self { registry })
    }

    pub fn registry(&self) -> &Registry<BlockList> {
        &self.registry
    }

    /// Path the current instance of `name` was loaded from.
    fn path_of(&self, name: &str) -> Option<String> {
        self.registry.get(name).and_then(|slot| slot.last_conf())
    }
}

/// Build the router for the query and admin endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/q", get(handlers::query))
        .route("/admin/reload", get(handlers::reload))
        .route("/admin/status", get(handlers::status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load every configured resource, then serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    info!(resources = ?state.registry.names(), "Resources loaded");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("start http://{}/q", config.bind);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
