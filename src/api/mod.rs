//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod auth;
mod divisions;
mod employees;
mod grades;
mod health;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth::public_routes())
}

/// Protected API routes (authentication + route guard required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::protected_routes())
        .nest("/divisions", divisions::routes())
        .nest("/employees", employees::routes())
        .nest("/grades", grades::routes())
}
