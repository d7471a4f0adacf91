//! Grade repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{Grade, UpdateGradeRequest};

#[derive(Debug, sqlx::FromRow)]
struct GradeRow {
    id: String,
    name: String,
    description: Option<String>,
    created_at: String,
    updated_at: String,
}

pub struct GradeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GradeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Grade>> {
        let rows = sqlx::query_as::<_, GradeRow>(
            "SELECT id, name, description, created_at, updated_at FROM grades ORDER BY name",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list grades")?;

        Ok(rows.into_iter().map(row_to_grade).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Grade>> {
        let row = sqlx::query_as::<_, GradeRow>(
            "SELECT id, name, description, created_at, updated_at FROM grades WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get grade")?;

        Ok(row.map(row_to_grade))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Grade>> {
        let row = sqlx::query_as::<_, GradeRow>(
            "SELECT id, name, description, created_at, updated_at FROM grades WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get grade by name")?;

        Ok(row.map(row_to_grade))
    }

    pub async fn update(&self, id: Uuid, req: &UpdateGradeRequest) -> Result<Option<Grade>> {
        let existing = self.get_by_id(id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let name = req.name.clone().unwrap_or(existing.name);
        let description = req.description.clone().or(existing.description);
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE grades SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&description)
            .bind(&now)
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to update grade")?;

        self.get_by_id(id).await
    }
}

fn row_to_grade(row: GradeRow) -> Grade {
    Grade {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        name: row.name,
        description: row.description,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
