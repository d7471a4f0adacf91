//! Division repository
//!
//! Membership lives in a join table keyed by division, with a position
//! column preserving insertion order. Membership rewrites and deletes run
//! in one transaction so a division's member set and manager change
//! atomically.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::Division;

#[derive(Debug, sqlx::FromRow)]
struct DivisionRow {
    id: String,
    name: String,
    current_project: Option<String>,
    manager_id: Option<String>,
    seeded: bool,
    created_at: String,
    updated_at: String,
}

pub struct DivisionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DivisionRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Division>> {
        let rows = sqlx::query_as::<_, DivisionRow>(
            "SELECT id, name, current_project, manager_id, seeded, created_at, updated_at
             FROM divisions ORDER BY name",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list divisions")?;

        let mut members = self.all_member_ids().await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let ids = members
                    .remove(&row.id)
                    .unwrap_or_default();
                row_to_division(row, ids)
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Division>> {
        let row = sqlx::query_as::<_, DivisionRow>(
            "SELECT id, name, current_project, manager_id, seeded, created_at, updated_at
             FROM divisions WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get division")?;

        match row {
            Some(row) => {
                let members = self.member_ids(id).await?;
                Ok(Some(row_to_division(row, members)))
            }
            None => Ok(None),
        }
    }

    /// Case-sensitive name lookup (division names are unique)
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Division>> {
        let row = sqlx::query_as::<_, DivisionRow>(
            "SELECT id, name, current_project, manager_id, seeded, created_at, updated_at
             FROM divisions WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get division by name")?;

        match row {
            Some(row) => {
                let id = Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil());
                let members = self.member_ids(id).await?;
                Ok(Some(row_to_division(row, members)))
            }
            None => Ok(None),
        }
    }

    /// Member ids of one division, in insertion order
    pub async fn member_ids(&self, division_id: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT employee_id FROM division_members WHERE division_id = ? ORDER BY position",
        )
        .bind(division_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to fetch division members")?;

        Ok(rows
            .into_iter()
            .filter_map(|(id,)| Uuid::parse_str(&id).ok())
            .collect())
    }

    pub async fn create(&self, division: &Division) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin create transaction")?;

        sqlx::query(
            "INSERT INTO divisions (id, name, current_project, manager_id, seeded, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(division.id.to_string())
        .bind(&division.name)
        .bind(&division.current_project)
        .bind(division.manager_id.map(|id| id.to_string()))
        .bind(division.seeded)
        .bind(division.created_at.to_rfc3339())
        .bind(division.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .context("Failed to create division")?;

        for (position, employee_id) in division.employee_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO division_members (division_id, employee_id, position) VALUES (?, ?, ?)",
            )
            .bind(division.id.to_string())
            .bind(employee_id.to_string())
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .context("Failed to insert division member")?;
        }

        tx.commit()
            .await
            .context("Failed to commit create transaction")?;

        Ok(())
    }

    /// Replace a division's manager and member set wholesale
    pub async fn replace_members_and_manager(
        &self,
        division_id: Uuid,
        manager_id: Option<Uuid>,
        employee_ids: &[Uuid],
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let id_str = division_id.to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin update transaction")?;

        sqlx::query("UPDATE divisions SET manager_id = ?, updated_at = ? WHERE id = ?")
            .bind(manager_id.map(|id| id.to_string()))
            .bind(updated_at.to_rfc3339())
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to update division")?;

        sqlx::query("DELETE FROM division_members WHERE division_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to clear division members")?;

        for (position, employee_id) in employee_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO division_members (division_id, employee_id, position) VALUES (?, ?, ?)",
            )
            .bind(&id_str)
            .bind(employee_id.to_string())
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .context("Failed to insert division member")?;
        }

        tx.commit()
            .await
            .context("Failed to commit update transaction")?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let id_str = id.to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin delete transaction")?;

        sqlx::query("DELETE FROM division_members WHERE division_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to clear division members")?;

        let result = sqlx::query("DELETE FROM divisions WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to delete division")?;

        tx.commit()
            .await
            .context("Failed to commit delete transaction")?;

        Ok(result.rows_affected() > 0)
    }

    async fn all_member_ids(&self) -> Result<HashMap<String, Vec<Uuid>>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT division_id, employee_id FROM division_members ORDER BY division_id, position",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to fetch division members")?;

        let mut map: HashMap<String, Vec<Uuid>> = HashMap::new();
        for (division_id, employee_id) in rows {
            if let Ok(id) = Uuid::parse_str(&employee_id) {
                map.entry(division_id).or_default().push(id);
            }
        }
        Ok(map)
    }
}

fn row_to_division(row: DivisionRow, employee_ids: Vec<Uuid>) -> Division {
    Division {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        name: row.name,
        current_project: row.current_project,
        manager_id: row
            .manager_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id).ok()),
        employee_ids,
        seeded: row.seeded,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
