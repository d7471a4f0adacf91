//! Authentication principal models
//!
//! Two kinds of principals can log in: HR staff accounts (`admin` role) and
//! division-chief accounts (`chef` role). They live in separate tables and
//! are looked up in that order at login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role carried by a bearer token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Chef,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Chef => "chef",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "chef" => Ok(Role::Chef),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Account entity (staff or chef; the role is not stored, it is implied by
/// the table the account was loaded from)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(full_name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Account without password hash for safe serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPublic {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountPublic {
    pub fn from_account(account: Account, role: Role) -> Self {
        Self {
            id: account.id,
            full_name: account.full_name,
            email: account.email,
            role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authentication response with token
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AccountPublic,
}
