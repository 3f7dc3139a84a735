use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shared_utils::extractor::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl Validate for CreatePatientRequest {
    fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("first_name must not be empty".to_string());
        }
        if self.last_name.trim().is_empty() {
            return Err("last_name must not be empty".to_string());
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(format!("{:?} is not a valid email address", self.email)),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found.")]
    NotFound,

    #[error("Patient with email {email} already exists.")]
    EmailAlreadyExists { email: String },

    #[error("Database error: {0}")]
    DatabaseError(String),
}
