use tracing::{debug, info};

use shared_database::Database;

use crate::models::{CreatePatientRequest, Patient, PatientError};

pub struct PatientService {
    db: Database,
}

impl PatientService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        let email = request.email.trim().to_string();
        debug!("Creating new patient record for: {}", email);

        // Check if patient with email already exists
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM patients WHERE email = ?")
            .bind(&email)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(PatientError::EmailAlreadyExists { email });
        }

        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (first_name, last_name, email, phone)
            VALUES (?, ?, ?, ?)
            RETURNING id, first_name, last_name, email, phone
            "#,
        )
        .bind(request.first_name.trim())
        .bind(request.last_name.trim())
        .bind(&email)
        .bind(request.phone.as_deref())
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent insert of the same email
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                PatientError::EmailAlreadyExists { email: email.clone() }
            }
            other => PatientError::DatabaseError(other.to_string()),
        })?;

        info!("Patient {} created with ID: {}", patient.full_name(), patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        debug!("Fetching patient: {}", patient_id);

        sqlx::query_as::<_, Patient>(
            "SELECT id, first_name, last_name, email, phone FROM patients WHERE id = ?",
        )
        .bind(patient_id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| PatientError::DatabaseError(e.to_string()))?
        .ok_or(PatientError::NotFound)
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, first_name, last_name, email, phone FROM patients ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| PatientError::DatabaseError(e.to_string()))
    }
}
