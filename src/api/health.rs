//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// GET /api/v1/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "healthy".to_string(),
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "unhealthy".to_string()
        }
    };

    let status = if database == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}
