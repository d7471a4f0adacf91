//! Employee API endpoints
//!
//! Plain CRUD. Create requires full name, email, division, sex and hire
//! date; the division must exist; an embedded photo must decode to a
//! recognized still image. Deleting an employee clears any division
//! references they hold.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::EmployeeRepository,
    models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest},
    services::DivisionService,
    utils::{
        validation::{decode_photo, validate_phone},
        AppError,
    },
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/{id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid employee ID"))
}

async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = EmployeeRepository::new(&state.db).list().await.map_err(|e| {
        tracing::error!("Failed to list employees: {}", e);
        AppError::internal("Failed to list employees")
    })?;

    Ok(Json(employees))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, AppError> {
    let id = parse_id(&id)?;
    let employee = EmployeeRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get employee: {}", e);
            AppError::internal("Failed to get employee")
        })?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(Json(employee))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    payload.validate()?;

    let (Some(full_name), Some(email), Some(division_id), Some(sex), Some(hire_date)) = (
        payload.full_name,
        payload.email,
        payload.division_id,
        payload.sex,
        payload.hire_date,
    ) else {
        return Err(AppError::validation(
            "full_name, email, division_id, sex and hire_date are required",
        ));
    };

    DivisionService::new(state.db.clone())
        .ensure_exists(division_id)
        .await?;

    if let Some(ref phone) = payload.phone {
        if !validate_phone(phone) {
            return Err(AppError::validation("phone is not a valid number"));
        }
    }

    let photo = match payload.photo.as_deref() {
        Some(encoded) => Some(decode_photo(encoded)?),
        None => None,
    };

    let now = Utc::now();
    let employee = Employee {
        id: Uuid::new_v4(),
        full_name,
        birth_date: payload.birth_date,
        sex,
        national_id: payload.national_id,
        internal_id: payload.internal_id,
        address: payload.address,
        email,
        phone: payload.phone,
        grade: payload.grade,
        hire_date,
        mission: payload.mission,
        marital_status: payload.marital_status,
        diploma: payload.diploma,
        initial_training: payload.initial_training,
        activity: payload.activity,
        external_experience: payload.external_experience,
        internal_experience: payload.internal_experience,
        division_id,
        extra_info: payload.extra_info,
        photo,
        created_at: now,
        updated_at: now,
    };

    EmployeeRepository::new(&state.db)
        .create(&employee)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create employee: {}", e);
            AppError::internal("Failed to create employee")
        })?;

    tracing::info!(employee = %employee.full_name, "Employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, AppError> {
    let id = parse_id(&id)?;
    payload.validate()?;

    let repo = EmployeeRepository::new(&state.db);
    let mut employee = repo
        .get_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get employee: {}", e);
            AppError::internal("Failed to get employee")
        })?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    if let Some(division_id) = payload.division_id {
        DivisionService::new(state.db.clone())
            .ensure_exists(division_id)
            .await?;
        employee.division_id = division_id;
    }
    if let Some(encoded) = payload.photo.as_deref() {
        employee.photo = Some(decode_photo(encoded)?);
    }

    if let Some(full_name) = payload.full_name {
        employee.full_name = full_name;
    }
    if let Some(email) = payload.email {
        employee.email = email;
    }
    if let Some(sex) = payload.sex {
        employee.sex = sex;
    }
    if let Some(hire_date) = payload.hire_date {
        employee.hire_date = hire_date;
    }
    if let Some(birth_date) = payload.birth_date {
        employee.birth_date = Some(birth_date);
    }
    if let Some(national_id) = payload.national_id {
        employee.national_id = Some(national_id);
    }
    if let Some(internal_id) = payload.internal_id {
        employee.internal_id = Some(internal_id);
    }
    if let Some(address) = payload.address {
        employee.address = Some(address);
    }
    if let Some(phone) = payload.phone {
        if !validate_phone(&phone) {
            return Err(AppError::validation("phone is not a valid number"));
        }
        employee.phone = Some(phone);
    }
    if let Some(grade) = payload.grade {
        employee.grade = Some(grade);
    }
    if let Some(mission) = payload.mission {
        employee.mission = Some(mission);
    }
    if let Some(marital_status) = payload.marital_status {
        employee.marital_status = Some(marital_status);
    }
    if let Some(diploma) = payload.diploma {
        employee.diploma = Some(diploma);
    }
    if let Some(initial_training) = payload.initial_training {
        employee.initial_training = Some(initial_training);
    }
    if let Some(activity) = payload.activity {
        employee.activity = Some(activity);
    }
    if let Some(external_experience) = payload.external_experience {
        employee.external_experience = Some(external_experience);
    }
    if let Some(internal_experience) = payload.internal_experience {
        employee.internal_experience = Some(internal_experience);
    }
    if let Some(extra_info) = payload.extra_info {
        employee.extra_info = extra_info;
    }
    employee.updated_at = Utc::now();

    repo.update(&employee).await.map_err(|e| {
        tracing::error!("Failed to update employee: {}", e);
        AppError::internal("Failed to update employee")
    })?;

    Ok(Json(employee))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    let id = parse_id(&id)?;

    let deleted = EmployeeRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete employee: {}", e);
            AppError::internal("Failed to delete employee")
        })?;

    if !deleted {
        return Err(AppError::not_found("Employee not found"));
    }

    tracing::info!(employee_id = %id, "Employee deleted");
    Ok(Json(true))
}
