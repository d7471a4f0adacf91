//! Database schema and seed data
//!
//! The schema is created programmatically with idempotent statements so a
//! fresh database and an existing one both end up in the same state. Seed
//! rows cover the system-provisioned divisions, the grade catalogue and the
//! bootstrap admin account.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::services::AuthService;

/// Divisions provisioned at initialization; protected from ordinary mutation
const SEEDED_DIVISIONS: &[&str] = &["DAEC", "DSI", "DRH"];

/// Initial grade catalogue
const SEEDED_GRADES: &[(&str, &str)] = &[
    ("Engineer", "Engineering staff"),
    ("Senior Engineer", "Engineering staff with lead responsibilities"),
    ("Technician", "Technical support staff"),
    ("Analyst", "Business and data analysis staff"),
    ("Administrative Assistant", "Administrative support staff"),
];

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS chef_accounts (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS divisions (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        current_project TEXT,
        manager_id TEXT,
        seeded INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS division_members (
        division_id TEXT NOT NULL,
        employee_id TEXT NOT NULL,
        position INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (division_id, employee_id)
    )",
    "CREATE TABLE IF NOT EXISTS employees (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        birth_date TEXT,
        sex TEXT NOT NULL,
        national_id TEXT,
        internal_id TEXT,
        address TEXT,
        email TEXT NOT NULL,
        phone TEXT,
        grade TEXT,
        hire_date TEXT NOT NULL,
        mission TEXT,
        marital_status TEXT,
        diploma TEXT,
        initial_training TEXT,
        activity TEXT,
        external_experience TEXT,
        internal_experience TEXT,
        division_id TEXT NOT NULL,
        extra_info TEXT NOT NULL DEFAULT '[]',
        photo BLOB,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS grades (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_employees_division ON employees (division_id)",
    "CREATE INDEX IF NOT EXISTS idx_members_employee ON division_members (employee_id)",
];

/// Create the schema and insert seed rows
pub async fn run(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to run schema statement")?;
    }

    seed_divisions(pool).await?;
    seed_grades(pool).await?;

    Ok(())
}

async fn seed_divisions(pool: &SqlitePool) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    for name in SEEDED_DIVISIONS {
        // The unique name constraint makes re-seeding a no-op
        sqlx::query(
            "INSERT OR IGNORE INTO divisions (id, name, seeded, created_at, updated_at)
             VALUES (?, ?, 1, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to seed division {}", name))?;
    }
    Ok(())
}

async fn seed_grades(pool: &SqlitePool) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    for (name, description) in SEEDED_GRADES {
        sqlx::query(
            "INSERT OR IGNORE INTO grades (id, name, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(description)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to seed grade {}", name))?;
    }
    Ok(())
}

/// Create the bootstrap admin account if it does not exist yet
pub async fn seed_bootstrap_admin(pool: &SqlitePool, auth: &AuthConfig) -> Result<()> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM accounts WHERE email = ?")
        .bind(&auth.bootstrap_admin_email)
        .fetch_optional(pool)
        .await
        .context("Failed to check for bootstrap admin")?;

    if existing.is_some() {
        return Ok(());
    }

    let password_hash = AuthService::hash_password(&auth.bootstrap_admin_password)?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO accounts (id, full_name, email, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind("Administrator")
    .bind(&auth.bootstrap_admin_email)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .context("Failed to create bootstrap admin")?;

    info!(email = %auth.bootstrap_admin_email, "Created bootstrap admin account");
    if auth.bootstrap_admin_password == "admin" {
        warn!("Bootstrap admin uses the default password; change it in the configuration");
    }

    Ok(())
}
