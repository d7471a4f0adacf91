//! Employee model

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Employee sex
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Sex::Male),
            "Female" => Ok(Sex::Female),
            _ => Err(format!("Invalid sex: {}", s)),
        }
    }
}

/// Marital status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::Divorced => "Divorced",
        }
    }
}

impl std::str::FromStr for MaritalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" => Ok(MaritalStatus::Single),
            "Married" => Ok(MaritalStatus::Married),
            "Divorced" => Ok(MaritalStatus::Divorced),
            _ => Err(format!("Invalid marital status: {}", s)),
        }
    }
}

/// Free-text supplementary information entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtraInfoEntry {
    pub title: String,
    pub description: String,
}

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub sex: Sex,
    pub national_id: Option<String>,
    pub internal_id: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub grade: Option<String>,
    pub hire_date: NaiveDate,
    pub mission: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub diploma: Option<String>,
    pub initial_training: Option<String>,
    pub activity: Option<String>,
    pub external_experience: Option<String>,
    pub internal_experience: Option<String>,
    pub division_id: Uuid,
    #[serde(default)]
    pub extra_info: Vec<ExtraInfoEntry>,
    /// Embedded photo, base64-encoded on the wire
    #[serde(default, with = "photo_base64", skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Whole years elapsed since the hire date
    pub fn seniority_years(&self) -> i32 {
        seniority_years(self.hire_date, Utc::now().date_naive())
    }
}

/// Whole years between a hire date and a reference date, never negative
pub fn seniority_years(hire_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - hire_date.year();
    if (today.month(), today.day()) < (hire_date.month(), hire_date.day()) {
        years -= 1;
    }
    years.max(0)
}

/// Compact projection used by listings and the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub full_name: String,
    pub grade: Option<String>,
    pub mission: Option<String>,
    pub division_id: Uuid,
    pub seniority_years: i32,
}

/// Request to create a new employee
///
/// `full_name`, `email`, `division_id`, `sex` and `hire_date` are required;
/// they are optional here so their absence surfaces as a validation error
/// rather than a deserialization failure. Aliases accept the camelCase
/// field names the admin dashboard sends.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, message = "full_name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(alias = "divisionId")]
    pub division_id: Option<Uuid>,
    pub sex: Option<Sex>,
    #[serde(alias = "hireDate")]
    pub hire_date: Option<NaiveDate>,
    #[serde(alias = "birthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(alias = "nationalId")]
    pub national_id: Option<String>,
    #[serde(alias = "internalId")]
    pub internal_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub grade: Option<String>,
    pub mission: Option<String>,
    #[serde(alias = "maritalStatus")]
    pub marital_status: Option<MaritalStatus>,
    pub diploma: Option<String>,
    #[serde(alias = "initialTraining")]
    pub initial_training: Option<String>,
    pub activity: Option<String>,
    #[serde(alias = "externalExperience")]
    pub external_experience: Option<String>,
    #[serde(alias = "internalExperience")]
    pub internal_experience: Option<String>,
    #[serde(default, alias = "extraInfo")]
    pub extra_info: Vec<ExtraInfoEntry>,
    /// Base64-encoded still image
    pub photo: Option<String>,
}

/// Request to update an employee (partial field replacement)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, message = "full_name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(alias = "divisionId")]
    pub division_id: Option<Uuid>,
    pub sex: Option<Sex>,
    #[serde(alias = "hireDate")]
    pub hire_date: Option<NaiveDate>,
    #[serde(alias = "birthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(alias = "nationalId")]
    pub national_id: Option<String>,
    #[serde(alias = "internalId")]
    pub internal_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub grade: Option<String>,
    pub mission: Option<String>,
    #[serde(alias = "maritalStatus")]
    pub marital_status: Option<MaritalStatus>,
    pub diploma: Option<String>,
    #[serde(alias = "initialTraining")]
    pub initial_training: Option<String>,
    pub activity: Option<String>,
    #[serde(alias = "externalExperience")]
    pub external_experience: Option<String>,
    #[serde(alias = "internalExperience")]
    pub internal_experience: Option<String>,
    #[serde(alias = "extraInfo")]
    pub extra_info: Option<Vec<ExtraInfoEntry>>,
    /// Base64-encoded still image
    pub photo: Option<String>,
}

/// Serde helper: photo bytes as a base64 string on the wire
mod photo_base64 {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        photo: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match photo {
            Some(bytes) => serializer.serialize_str(&BASE64.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        match encoded {
            Some(s) => BASE64
                .decode(s.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
