//! Grade catalogue model
//!
//! Grades are an independently maintained lookup table. `Employee.grade`
//! stays a free-text label with no foreign key against this catalogue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grade entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to update a grade
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGradeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}
