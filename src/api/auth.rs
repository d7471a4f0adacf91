//! Authentication API endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::{
    middleware::auth::{create_access_token, AuthUser},
    models::{AccountPublic, AuthResponse, LoginRequest},
    services::AuthService,
    utils::AppError,
    AppState,
};

/// Public authentication routes (no auth required)
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Protected authentication routes
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// Login handler
///
/// POST /api/v1/auth/login
///
/// Failure responses are identical whether the email was unknown or the
/// password was wrong.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone());

    let (account, role) = auth_service
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            tracing::error!("Authentication failed: {}", e);
            AppError::internal("Authentication failed")
        })?
        .ok_or(AppError::InvalidCredentials)?;

    let token = create_access_token(
        &account,
        role,
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to create access token: {}", e);
        AppError::internal("Failed to create access token")
    })?;

    info!(email = %account.email, role = %role, "Login succeeded");

    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.token_expiry_hours * 3600,
        user: AccountPublic::from_account(account, role),
    }))
}

/// Current principal handler
///
/// GET /api/v1/auth/me
async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<AccountPublic>, AppError> {
    let account = AuthService::new(state.db.clone())
        .get_account(auth_user.role, auth_user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch account: {}", e);
            AppError::internal("Failed to fetch account")
        })?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok(Json(AccountPublic::from_account(account, auth_user.role)))
}
