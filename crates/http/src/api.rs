//! Route handlers for the location proxy.

use axum::{
    extract::{Query, State},
    Json,
};
use placefind_core::{Candidate, LocationProvider};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::error::AppError;
use crate::ApiState;

#[derive(Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

pub async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /api/locations?q=<text>[&limit=n]`
///
/// Short queries answer `[]` without touching the provider. The length is counted
/// in chars on the untrimmed text, the same as the search box. `limit` is clamped
/// to `1..=` the configured cap.
pub async fn api_locations<P: LocationProvider>(
    State(state): State<Arc<ApiState<P>>>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let query = params.q.as_str();
    if query.chars().count() < state.min_query_len {
        return Ok(Json(Vec::new()));
    }

    let limit = params.limit.unwrap_or(state.limit).clamp(1, state.limit.max(1));
    match state.provider.search(query, limit).await {
        Ok(candidates) => Ok(Json(candidates)),
        Err(e) => {
            warn!(provider = state.provider.name(), query, "Location lookup failed: {e}");
            Err(e.into())
        }
    }
}
