//! Authentication service
//!
//! Password hashing with Argon2 and principal authentication. Login checks
//! staff accounts first and falls back to division-chief accounts; a failed
//! login never reveals which lookup or comparison failed.

use anyhow::Result;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::AccountRepository;
use crate::models::{Account, Role};

/// Authentication service
pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Authenticate a principal by email and password.
    ///
    /// Staff accounts are consulted first, then chef accounts. Returns the
    /// matched account and its role, or `None` for any failure.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<(Account, Role)>> {
        let repo = AccountRepository::new(&self.pool);

        if let Some(account) = repo.find_by_email(Role::Admin, email).await? {
            return Ok(if Self::verify_password(password, &account.password_hash)? {
                Some((account, Role::Admin))
            } else {
                None
            });
        }

        if let Some(account) = repo.find_by_email(Role::Chef, email).await? {
            return Ok(if Self::verify_password(password, &account.password_hash)? {
                Some((account, Role::Chef))
            } else {
                None
            });
        }

        Ok(None)
    }

    /// Fetch an account by id within a role's table
    pub async fn get_account(&self, role: Role, id: Uuid) -> Result<Option<Account>> {
        AccountRepository::new(&self.pool).find_by_id(role, id).await
    }
}
