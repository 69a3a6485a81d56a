use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

use crate::error::FilterError;
use crate::storage::{CveFilter, Database};
use crate::sync::{RunOutcome, SyncController, SyncStatus};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub controller: Arc<SyncController>,
    pub sync_status: Arc<SyncStatus>,
    pub ready: Arc<AtomicBool>,
}

/// Raw query parameters for `GET /cves`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub cve_id: Option<String>,
    pub year: Option<String>,
    /// Minimum score threshold, numeric string
    pub score: Option<String>,
    /// Modified within the last N days, integer string
    pub days: Option<String>,
}

impl ListQuery {
    /// Parse the raw parameters, rejecting malformed input instead of
    /// silently defaulting.
    pub fn try_into_filter(&self) -> Result<CveFilter, FilterError> {
        let min_score = match &self.score {
            Some(raw) => {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| FilterError::InvalidScore(raw.clone()))?;
                if !value.is_finite() {
                    return Err(FilterError::InvalidScore(raw.clone()));
                }
                Some(value)
            }
            None => None,
        };

        let since_days = match &self.days {
            Some(raw) => {
                let value: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| FilterError::InvalidDays(raw.clone()))?;
                if value < 0 {
                    return Err(FilterError::InvalidDays(raw.clone()));
                }
                Some(value)
            }
            None => None,
        };

        if let Some(year) = &self.year
            && (year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(FilterError::InvalidYear(year.clone()));
        }

        Ok(CveFilter {
            cve_id: self.cve_id.clone(),
            year: self.year.clone(),
            min_score,
            since_days,
        })
    }
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Sync run state for the status endpoint
#[derive(Serialize)]
pub struct SyncStatusResponse {
    pub running: bool,
    pub last_run: Option<RunOutcome>,
}

// ============================================
// Handlers
// ============================================

/// List records matching the filter parameters
pub async fn list_cves(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let filter = match query.try_into_filter() {
        Ok(filter) => filter,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.db.query_cves(&filter) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to query records");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Get statistics
pub async fn get_stats(State(state): State<AppState>) -> Response {
    match state.db.get_stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get stats");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Trigger a sync run; drops the request when one is already active
pub async fn trigger_sync(State(state): State<AppState>) -> impl IntoResponse {
    if state.sync_status.is_running() {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "sync already in progress"})),
        );
    }

    info!("Manual sync triggered");
    let controller = state.controller.clone();
    tokio::spawn(async move {
        controller.run().await;
    });

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({"status": "started"})),
    )
}

/// Get sync run status
pub async fn get_sync_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = SyncStatusResponse {
        running: state.sync_status.is_running(),
        last_run: state.sync_status.last_run(),
    };
    (StatusCode::OK, Json(status))
}

/// Liveness probe
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness probe
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.ready.load(Ordering::SeqCst) {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}
