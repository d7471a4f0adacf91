//! Database layer
//!
//! SQLite-backed storage for accounts, employees, divisions and grades.
//! One repository per entity kind; schema and seed rows are created at
//! startup by `migrations::run`.

pub mod account_repository;
pub mod division_repository;
pub mod employee_repository;
pub mod grade_repository;
pub mod migrations;

pub use account_repository::AccountRepository;
pub use division_repository::DivisionRepository;
pub use employee_repository::EmployeeRepository;
pub use grade_repository::GradeRepository;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::DatabaseConfig;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and bring the schema up to date
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    migrations::run(&pool).await?;

    Ok(pool)
}

/// Parse a stored timestamp, tolerating both RFC 3339 and the bare
/// `YYYY-MM-DD HH:MM:SS` form SQLite tools tend to write
pub(crate) fn parse_db_timestamp(ts: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc);
    }
    Utc::now()
}

/// Parse a stored calendar date column
pub(crate) fn parse_db_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
