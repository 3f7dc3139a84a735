use tracing::{debug, info};

use shared_database::Database;

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, DoctorListQuery};

pub struct DoctorService {
    db: Database,
}

impl DoctorService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Create a new doctor profile
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating new doctor profile for: {}", request.full_name);

        let doctor = sqlx::query_as::<_, Doctor>(
            r#"
            INSERT INTO doctors (full_name, specialization, is_active)
            VALUES (?, ?, ?)
            RETURNING id, full_name, specialization, is_active
            "#,
        )
        .bind(request.full_name.trim())
        .bind(request.specialization.trim())
        .bind(request.is_active)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!("Doctor {} created with ID: {} (active: {})", doctor.full_name, doctor.id, doctor.is_active);
        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        sqlx::query_as::<_, Doctor>(
            "SELECT id, full_name, specialization, is_active FROM doctors WHERE id = ?",
        )
        .bind(doctor_id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
        .ok_or(DoctorError::NotFound)
    }

    pub async fn list_doctors(&self, query: DoctorListQuery) -> Result<Vec<Doctor>, DoctorError> {
        let doctors = match query.active {
            Some(active) => {
                sqlx::query_as::<_, Doctor>(
                    "SELECT id, full_name, specialization, is_active FROM doctors WHERE is_active = ? ORDER BY id",
                )
                .bind(active)
                .fetch_all(self.db.pool())
                .await
            }
            None => {
                sqlx::query_as::<_, Doctor>(
                    "SELECT id, full_name, specialization, is_active FROM doctors ORDER BY id",
                )
                .fetch_all(self.db.pool())
                .await
            }
        };

        doctors.map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }
}
