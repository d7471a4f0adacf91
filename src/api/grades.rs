//! Grade API endpoints
//!
//! The grade catalogue is seeded at startup; the API exposes read and
//! update only.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::{
    db::GradeRepository,
    models::{Grade, UpdateGradeRequest},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades))
        .route("/{id}", get(get_grade).put(update_grade))
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid grade ID"))
}

async fn list_grades(State(state): State<AppState>) -> Result<Json<Vec<Grade>>, AppError> {
    let grades = GradeRepository::new(&state.db).list().await.map_err(|e| {
        tracing::error!("Failed to list grades: {}", e);
        AppError::internal("Failed to list grades")
    })?;

    Ok(Json(grades))
}

async fn get_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Grade>, AppError> {
    let id = parse_id(&id)?;
    let grade = GradeRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get grade: {}", e);
            AppError::internal("Failed to get grade")
        })?
        .ok_or_else(|| AppError::not_found("Grade not found"))?;

    Ok(Json(grade))
}

async fn update_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateGradeRequest>,
) -> Result<Json<Grade>, AppError> {
    let id = parse_id(&id)?;
    let repo = GradeRepository::new(&state.db);

    if let Some(ref name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Grade name cannot be empty"));
        }
        // Renames must not collide with another grade
        if let Some(existing) = repo.get_by_name(name).await.map_err(|e| {
            tracing::error!("Failed to check grade name: {}", e);
            AppError::internal("Failed to check grade name")
        })? {
            if existing.id != id {
                return Err(AppError::conflict(format!(
                    "A grade named '{}' already exists",
                    name
                )));
            }
        }
    }

    let grade = repo
        .update(id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update grade: {}", e);
            AppError::internal("Failed to update grade")
        })?
        .ok_or_else(|| AppError::not_found("Grade not found"))?;

    Ok(Json(grade))
}
