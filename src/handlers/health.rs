// handlers/health.rs - GET /health

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub database: &'static str,
}

pub async fn health_get(State(state): State<AppState>) -> ApiResult<Health> {
    if let Err(e) = DatabaseManager::health_check(&state.pool).await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(ApiResponse::body(Health {
        status: "ok",
        timestamp: chrono::Utc::now(),
        database: "ok",
    }))
}
