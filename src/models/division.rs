//! Division model
//!
//! Divisions carry the only invariants in the system: a manager must be a
//! member, seeded divisions are protected, and only empty divisions can be
//! deleted. The checks live in `services::division`; these are the shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Division entity as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub id: Uuid,
    pub name: String,
    pub current_project: Option<String>,
    pub manager_id: Option<Uuid>,
    /// Membership, in insertion order
    pub employee_ids: Vec<Uuid>,
    /// Provisioned at system initialization; protected from ordinary mutation
    pub seeded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member display attributes resolved for read responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionMember {
    pub id: Uuid,
    pub full_name: String,
    pub grade: Option<String>,
    pub mission: Option<String>,
}

/// Read-model projection of a division with manager and members resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionDetail {
    pub id: Uuid,
    pub name: String,
    pub current_project: Option<String>,
    pub seeded: bool,
    pub manager: Option<DivisionMember>,
    pub employees: Vec<DivisionMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a division
///
/// Aliases accept the camelCase field names the admin dashboard sends.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDivisionRequest {
    pub name: String,
    #[serde(alias = "currentProject")]
    pub current_project: Option<String>,
    #[serde(alias = "managerId")]
    pub manager_id: Option<Uuid>,
    #[serde(default, alias = "employeeIds")]
    pub employee_ids: Vec<Uuid>,
}

/// Request to update a division's manager and membership.
///
/// An absent or null `manager_id` clears the manager. An absent
/// `employee_ids` leaves membership untouched; a present one replaces it
/// wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDivisionRequest {
    #[serde(alias = "managerId")]
    pub manager_id: Option<Uuid>,
    #[serde(alias = "employeeIds")]
    pub employee_ids: Option<Vec<Uuid>>,
}

/// Query parameters for the employee search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeSearchQuery {
    /// Case-insensitive substring match on full name
    pub query: Option<String>,
    /// Comma-separated set of grade labels, matched exactly
    pub grade: Option<String>,
    /// Restrict to one division
    #[serde(alias = "divisionId")]
    pub division_id: Option<Uuid>,
    /// Drop one id from the results (current manager, typically)
    #[serde(alias = "excludeId")]
    pub exclude_id: Option<Uuid>,
}

impl EmployeeSearchQuery {
    /// Grade labels parsed out of the comma-separated `grade` parameter
    pub fn grade_labels(&self) -> Vec<String> {
        self.grade
            .as_deref()
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
