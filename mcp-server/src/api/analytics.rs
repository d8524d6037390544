use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};
use validator::Validate;

use crate::{
    blockchain::models::{AnalyticsError, AnalyticsRequest, AnalyticsResult, DEFAULT_LIMIT},
    AppState,
};

// --- Request Models ---

/// Query parameters for the analytics endpoints.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub limit: Option<u32>,
}

// --- Handlers ---

/// Handler for GET /analytics/{address}
pub async fn get_address_analytics_handler(
    Path(address): Path<String>,
    Query(query): Query<AnalyticsQuery>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResult>, (StatusCode, String)> {
    info!("Received analytics request for address '{}'", address);
    run_analytics(&state, Some(address), query.limit).await
}

/// Handler for GET /analytics, analyzing the connected wallet.
pub async fn get_wallet_analytics_handler(
    Query(query): Query<AnalyticsQuery>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResult>, (StatusCode, String)> {
    info!("Received analytics request for the connected wallet");
    run_analytics(&state, None, query.limit).await
}

async fn run_analytics(
    state: &AppState,
    address: Option<String>,
    limit: Option<u32>,
) -> Result<Json<AnalyticsResult>, (StatusCode, String)> {
    let request = AnalyticsRequest {
        address,
        limit: limit.unwrap_or(DEFAULT_LIMIT),
    };
    request
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid request: {}", e)))?;

    match state.analytics.analyze(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e @ AnalyticsError::InvalidAddress(_)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            error!("Failed to analyze wallet: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to analyze wallet: {}", e),
            ))
        }
    }
}

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(get_wallet_analytics_handler))
        .route("/analytics/:address", get(get_address_analytics_handler))
}
