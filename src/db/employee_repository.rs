//! Employee repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{parse_db_date, parse_db_timestamp};
use crate::models::{Employee, EmployeeSearchQuery, EmployeeSummary, Sex};

const EMPLOYEE_COLUMNS: &str = "id, full_name, birth_date, sex, national_id, internal_id, \
     address, email, phone, grade, hire_date, mission, marital_status, diploma, \
     initial_training, activity, external_experience, internal_experience, division_id, \
     extra_info, photo, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: String,
    full_name: String,
    birth_date: Option<String>,
    sex: String,
    national_id: Option<String>,
    internal_id: Option<String>,
    address: Option<String>,
    email: String,
    phone: Option<String>,
    grade: Option<String>,
    hire_date: String,
    mission: Option<String>,
    marital_status: Option<String>,
    diploma: Option<String>,
    initial_training: Option<String>,
    activity: Option<String>,
    external_experience: Option<String>,
    internal_experience: Option<String>,
    division_id: String,
    extra_info: String,
    photo: Option<Vec<u8>>,
    created_at: String,
    updated_at: String,
}

pub struct EmployeeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees ORDER BY full_name",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .fetch_all(self.pool)
            .await
            .context("Failed to list employees")?;

        Ok(rows.into_iter().map(row_to_employee).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await
            .context("Failed to get employee")?;

        Ok(row.map(row_to_employee))
    }

    /// Subset of `ids` that exist in the employees table
    pub async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT id FROM employees WHERE id IN ({})", placeholders);

        let mut query = sqlx::query_as::<_, (String,)>(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }

        let rows = query
            .fetch_all(self.pool)
            .await
            .context("Failed to check employee ids")?;

        Ok(rows
            .into_iter()
            .filter_map(|(id,)| Uuid::parse_str(&id).ok())
            .collect())
    }

    pub async fn create(&self, employee: &Employee) -> Result<()> {
        let sql = format!(
            "INSERT INTO employees ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            EMPLOYEE_COLUMNS
        );
        bind_employee(sqlx::query(&sql), employee)
            .execute(self.pool)
            .await
            .context("Failed to create employee")?;

        Ok(())
    }

    pub async fn update(&self, employee: &Employee) -> Result<()> {
        sqlx::query(
            "UPDATE employees SET full_name = ?, birth_date = ?, sex = ?, national_id = ?,
             internal_id = ?, address = ?, email = ?, phone = ?, grade = ?, hire_date = ?,
             mission = ?, marital_status = ?, diploma = ?, initial_training = ?, activity = ?,
             external_experience = ?, internal_experience = ?, division_id = ?, extra_info = ?,
             photo = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&employee.full_name)
        .bind(employee.birth_date.map(|d| d.to_string()))
        .bind(employee.sex.as_str())
        .bind(&employee.national_id)
        .bind(&employee.internal_id)
        .bind(&employee.address)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.grade)
        .bind(employee.hire_date.to_string())
        .bind(&employee.mission)
        .bind(employee.marital_status.map(|m| m.as_str()))
        .bind(&employee.diploma)
        .bind(&employee.initial_training)
        .bind(&employee.activity)
        .bind(&employee.external_experience)
        .bind(&employee.internal_experience)
        .bind(employee.division_id.to_string())
        .bind(serde_json::to_string(&employee.extra_info).unwrap_or_else(|_| "[]".to_string()))
        .bind(employee.photo.clone())
        .bind(employee.updated_at.to_rfc3339())
        .bind(employee.id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update employee")?;

        Ok(())
    }

    /// Delete an employee, clearing any division membership and manager
    /// slot they occupy so no dangling reference survives
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let id_str = id.to_string();
        let now = Utc::now().to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin delete transaction")?;

        sqlx::query("DELETE FROM division_members WHERE employee_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to clear division membership")?;

        sqlx::query("UPDATE divisions SET manager_id = NULL, updated_at = ? WHERE manager_id = ?")
            .bind(&now)
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to clear manager reference")?;

        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to delete employee")?;

        tx.commit()
            .await
            .context("Failed to commit delete transaction")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn summaries(&self) -> Result<Vec<EmployeeSummary>> {
        let sql = format!(
            "SELECT {} FROM employees ORDER BY full_name",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .fetch_all(self.pool)
            .await
            .context("Failed to list employee summaries")?;

        Ok(rows
            .into_iter()
            .map(|r| row_to_summary(row_to_employee(r)))
            .collect())
    }

    /// Summaries for the given ids, in the order the ids were given
    pub async fn summaries_by_ids(&self, ids: &[Uuid]) -> Result<Vec<EmployeeSummary>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM employees WHERE id IN ({})",
            EMPLOYEE_COLUMNS, placeholders
        );

        let mut query = sqlx::query_as::<_, EmployeeRow>(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }

        let mut summaries: Vec<EmployeeSummary> = query
            .fetch_all(self.pool)
            .await
            .context("Failed to fetch employee summaries")?
            .into_iter()
            .map(|r| row_to_summary(row_to_employee(r)))
            .collect();

        summaries.sort_by_key(|s| ids.iter().position(|id| *id == s.id).unwrap_or(usize::MAX));
        Ok(summaries)
    }

    /// Filtered employee search; all filters are optional and combined
    pub async fn search(&self, params: &EmployeeSearchQuery) -> Result<Vec<EmployeeSummary>> {
        let grades = params.grade_labels();

        let mut sql = format!("SELECT {} FROM employees WHERE 1 = 1", EMPLOYEE_COLUMNS);
        if params.query.is_some() {
            sql.push_str(" AND LOWER(full_name) LIKE ?");
        }
        if !grades.is_empty() {
            let placeholders = vec!["?"; grades.len()].join(", ");
            sql.push_str(&format!(" AND grade IN ({})", placeholders));
        }
        if params.division_id.is_some() {
            sql.push_str(" AND division_id = ?");
        }
        if params.exclude_id.is_some() {
            sql.push_str(" AND id != ?");
        }
        sql.push_str(" ORDER BY full_name");

        let mut query = sqlx::query_as::<_, EmployeeRow>(&sql);
        if let Some(ref q) = params.query {
            query = query.bind(format!("%{}%", q.to_lowercase()));
        }
        for grade in &grades {
            query = query.bind(grade);
        }
        if let Some(division_id) = params.division_id {
            query = query.bind(division_id.to_string());
        }
        if let Some(exclude_id) = params.exclude_id {
            query = query.bind(exclude_id.to_string());
        }

        let rows = query
            .fetch_all(self.pool)
            .await
            .context("Failed to search employees")?;

        Ok(rows
            .into_iter()
            .map(|r| row_to_summary(row_to_employee(r)))
            .collect())
    }
}

fn bind_employee<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    employee: &'q Employee,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(employee.id.to_string())
        .bind(&employee.full_name)
        .bind(employee.birth_date.map(|d| d.to_string()))
        .bind(employee.sex.as_str())
        .bind(&employee.national_id)
        .bind(&employee.internal_id)
        .bind(&employee.address)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.grade)
        .bind(employee.hire_date.to_string())
        .bind(&employee.mission)
        .bind(employee.marital_status.map(|m| m.as_str()))
        .bind(&employee.diploma)
        .bind(&employee.initial_training)
        .bind(&employee.activity)
        .bind(&employee.external_experience)
        .bind(&employee.internal_experience)
        .bind(employee.division_id.to_string())
        .bind(serde_json::to_string(&employee.extra_info).unwrap_or_else(|_| "[]".to_string()))
        .bind(employee.photo.clone())
        .bind(employee.created_at.to_rfc3339())
        .bind(employee.updated_at.to_rfc3339())
}

fn row_to_employee(row: EmployeeRow) -> Employee {
    Employee {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        full_name: row.full_name,
        birth_date: row.birth_date.as_deref().and_then(parse_db_date),
        sex: row.sex.parse().unwrap_or(Sex::Male),
        national_id: row.national_id,
        internal_id: row.internal_id,
        address: row.address,
        email: row.email,
        phone: row.phone,
        grade: row.grade,
        hire_date: parse_db_date(&row.hire_date).unwrap_or_default(),
        mission: row.mission,
        marital_status: row.marital_status.as_deref().and_then(|m| m.parse().ok()),
        diploma: row.diploma,
        initial_training: row.initial_training,
        activity: row.activity,
        external_experience: row.external_experience,
        internal_experience: row.internal_experience,
        division_id: Uuid::parse_str(&row.division_id).unwrap_or_else(|_| Uuid::nil()),
        extra_info: serde_json::from_str(&row.extra_info).unwrap_or_default(),
        photo: row.photo,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}

fn row_to_summary(employee: Employee) -> EmployeeSummary {
    EmployeeSummary {
        id: employee.id,
        full_name: employee.full_name.clone(),
        grade: employee.grade.clone(),
        mission: employee.mission.clone(),
        division_id: employee.division_id,
        seniority_years: employee.seniority_years(),
    }
}
