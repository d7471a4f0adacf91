//! Division API endpoints
//!
//! All state transitions go through the `DivisionService` so the
//! membership and seeded-record invariants are enforced at one seam.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::{
    middleware::rbac::seeded_override,
    models::{
        CreateDivisionRequest, DivisionDetail, EmployeeSearchQuery, EmployeeSummary,
        UpdateDivisionRequest,
    },
    services::DivisionService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_divisions).post(create_division))
        .route("/employees", get(list_employees))
        .route("/search", get(search_employees))
        .route(
            "/{id}",
            get(get_division)
                .put(update_division)
                .delete(delete_division),
        )
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid division ID"))
}

async fn list_divisions(
    State(state): State<AppState>,
) -> Result<Json<Vec<DivisionDetail>>, AppError> {
    let divisions = DivisionService::new(state.db.clone()).list().await?;
    Ok(Json(divisions))
}

async fn get_division(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DivisionDetail>, AppError> {
    let id = parse_id(&id)?;
    let division = DivisionService::new(state.db.clone()).get(id).await?;
    Ok(Json(division))
}

async fn create_division(
    State(state): State<AppState>,
    Json(payload): Json<CreateDivisionRequest>,
) -> Result<(StatusCode, Json<DivisionDetail>), AppError> {
    let division = DivisionService::new(state.db.clone()).create(payload).await?;

    tracing::info!(division = %division.name, "Division created");
    Ok((StatusCode::CREATED, Json(division)))
}

async fn update_division(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateDivisionRequest>,
) -> Result<Json<DivisionDetail>, AppError> {
    let id = parse_id(&id)?;
    let division = DivisionService::new(state.db.clone())
        .update(id, payload, seeded_override(&headers))
        .await?;

    Ok(Json(division))
}

async fn delete_division(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<bool>, AppError> {
    let id = parse_id(&id)?;
    DivisionService::new(state.db.clone())
        .delete(id, seeded_override(&headers))
        .await?;

    tracing::info!(division_id = %id, "Division deleted");
    Ok(Json(true))
}

async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeSummary>>, AppError> {
    let employees = DivisionService::new(state.db.clone()).employees().await?;
    Ok(Json(employees))
}

async fn search_employees(
    State(state): State<AppState>,
    Query(params): Query<EmployeeSearchQuery>,
) -> Result<Json<Vec<EmployeeSummary>>, AppError> {
    let employees = DivisionService::new(state.db.clone()).search(&params).await?;
    Ok(Json(employees))
}
