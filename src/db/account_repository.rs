//! Account repository
//!
//! Staff accounts and chef accounts live in separate tables. Login looks up
//! staff first and falls back to chefs; the role is implied by the table.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{Account, Role};

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    full_name: String,
    email: String,
    password_hash: String,
    created_at: String,
    updated_at: String,
}

pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    fn table(role: Role) -> &'static str {
        match role {
            Role::Admin => "accounts",
            Role::Chef => "chef_accounts",
        }
    }

    pub async fn find_by_email(&self, role: Role, email: &str) -> Result<Option<Account>> {
        let sql = format!(
            "SELECT id, full_name, email, password_hash, created_at, updated_at
             FROM {} WHERE email = ?",
            Self::table(role)
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await
            .context("Failed to fetch account by email")?;

        Ok(row.map(row_to_account))
    }

    pub async fn find_by_id(&self, role: Role, id: Uuid) -> Result<Option<Account>> {
        let sql = format!(
            "SELECT id, full_name, email, password_hash, created_at, updated_at
             FROM {} WHERE id = ?",
            Self::table(role)
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await
            .context("Failed to fetch account by id")?;

        Ok(row.map(row_to_account))
    }

    pub async fn create(&self, role: Role, account: &Account) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (id, full_name, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            Self::table(role)
        );
        sqlx::query(&sql)
            .bind(account.id.to_string())
            .bind(&account.full_name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.created_at.to_rfc3339())
            .bind(account.updated_at.to_rfc3339())
            .execute(self.pool)
            .await
            .context("Failed to create account")?;

        Ok(())
    }
}

fn row_to_account(row: AccountRow) -> Account {
    Account {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        full_name: row.full_name,
        email: row.email,
        password_hash: row.password_hash,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
