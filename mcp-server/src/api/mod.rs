//! # API Module
//!
//! HTTP handlers for the wallet analytics server, mounted under `/api`.
//!
//! ## Available Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /analytics` - Analytics for the connected wallet
//! - `GET /analytics/:address` - Analytics for any address
//! - `POST /rpc` - MCP JSON-RPC over HTTP
//!
//! The analytics endpoints accept an optional `?limit=` between 1 and 100.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod analytics;
pub mod health;
pub mod rpc;

/// Builds the full HTTP application.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .merge(analytics::create_analytics_router())
        .route("/rpc", post(rpc::rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
