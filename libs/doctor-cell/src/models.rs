use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shared_utils::extractor::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub full_name: String,
    pub specialization: String,
    pub is_active: bool,
}

impl Doctor {
    /// Only active doctors accept new appointments.
    pub fn is_bookable(&self) -> bool {
        self.is_active
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub full_name: String,
    pub specialization: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Validate for CreateDoctorRequest {
    fn validate(&self) -> Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("full_name must not be empty".to_string());
        }
        if self.specialization.trim().is_empty() {
            return Err("specialization must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorListQuery {
    pub active: Option<bool>,
}

impl Validate for DoctorListQuery {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found.")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
