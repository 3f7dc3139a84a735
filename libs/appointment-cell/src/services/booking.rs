// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use doctor_cell::models::{Doctor, DoctorError};
use doctor_cell::services::DoctorService;
use patient_cell::models::PatientError;
use patient_cell::services::PatientService;
use shared_database::{timestamps, Database};

use crate::models::{
    window_end, Appointment, AppointmentError, AppointmentListQuery, AppointmentRow,
    CreateAppointmentRequest,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::consistency::SchedulingLocks;

pub struct AppointmentBookingService {
    db: Database,
    locks: Arc<SchedulingLocks>,
    conflict_service: ConflictDetectionService,
    patient_service: PatientService,
    doctor_service: DoctorService,
}

impl AppointmentBookingService {
    pub fn new(db: &Database, locks: Arc<SchedulingLocks>) -> Self {
        Self {
            db: db.clone(),
            locks,
            conflict_service: ConflictDetectionService::new(db),
            patient_service: PatientService::new(db),
            doctor_service: DoctorService::new(db),
        }
    }

    /// Book an appointment starting from the current instant.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        self.admit_or_reject(request, Utc::now()).await
    }

    /// Admit the appointment and persist it, or reject it without writing.
    ///
    /// Checks run in order: patient exists, doctor exists, doctor is active,
    /// start is after `now`, no overlap with the doctor's book. The overlap
    /// scan and the insert happen under the doctor's scheduling lock.
    pub async fn admit_or_reject(
        &self,
        request: CreateAppointmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} at {}",
            request.patient_id, request.doctor_id, request.start_time_utc
        );

        // **Step 1: Verify References**
        self.verify_patient_exists(request.patient_id).await?;
        let doctor = self.verify_doctor_bookable(request.doctor_id).await?;

        // **Step 2: Validate Time Window**
        let start_time = timestamps::normalize(&request.start_time_utc);
        if start_time <= now {
            warn!("Rejected appointment in the past: {} <= {}", start_time, now);
            return Err(AppointmentError::InvalidTime(
                "Appointment time must be in the future.".to_string(),
            ));
        }
        if request.duration_minutes <= 0 {
            return Err(AppointmentError::InvalidTime(
                "Appointment duration must be a positive number of minutes.".to_string(),
            ));
        }
        let end_time = window_end(start_time, request.duration_minutes).ok_or_else(|| {
            AppointmentError::InvalidTime("Appointment duration is out of range.".to_string())
        })?;

        // **Step 3: Conflict Scan and Insert Under Lock**
        let _guard = self.locks.lock_doctor(doctor.id).await;

        if let Some(conflict) = self.conflict_service.check_conflicts(doctor.id, start_time, end_time).await? {
            return Err(AppointmentError::ConflictDetected {
                conflicting_appointment_id: conflict.id,
            });
        }

        let appointment = self
            .insert_appointment(request.patient_id, doctor.id, start_time, request.duration_minutes)
            .await?;

        info!(
            "Appointment {} booked with doctor {} from {} to {}",
            appointment.id,
            appointment.doctor_id,
            appointment.start_time_utc,
            appointment.end_time_utc()
        );
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, patient_id, doctor_id, start_time_utc, duration_minutes
            FROM appointments
            WHERE id = ?
            "#,
        )
        .bind(appointment_id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?
        .ok_or(AppointmentError::NotFound)?;

        Ok(Appointment::from(row))
    }

    /// All appointments by ascending start time, ties in booking order.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, patient_id, doctor_id, start_time_utc, duration_minutes
            FROM appointments
            ORDER BY start_time_utc, id
            "#,
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Appointments starting on the given UTC calendar day, optionally for one
    /// doctor.
    pub async fn list_appointments_on(
        &self,
        date: NaiveDate,
        doctor_id: Option<i64>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments on {} for doctor {:?}", date, doctor_id);

        let (day_start, day_end) = timestamps::day_bounds(date);

        let rows = match doctor_id {
            Some(doctor_id) => {
                sqlx::query_as::<_, AppointmentRow>(
                    r#"
                    SELECT id, patient_id, doctor_id, start_time_utc, duration_minutes
                    FROM appointments
                    WHERE start_time_utc >= ? AND start_time_utc < ? AND doctor_id = ?
                    ORDER BY start_time_utc, id
                    "#,
                )
                .bind(day_start)
                .bind(day_end)
                .bind(doctor_id)
                .fetch_all(self.db.pool())
                .await
            }
            None => {
                sqlx::query_as::<_, AppointmentRow>(
                    r#"
                    SELECT id, patient_id, doctor_id, start_time_utc, duration_minutes
                    FROM appointments
                    WHERE start_time_utc >= ? AND start_time_utc < ?
                    ORDER BY start_time_utc, id
                    "#,
                )
                .bind(day_start)
                .bind(day_end)
                .fetch_all(self.db.pool())
                .await
            }
        }
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Resolve the `GET /appointments` filters to a listing.
    pub async fn search_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        match (query.date, query.doctor_id) {
            (Some(date), doctor_id) => self.list_appointments_on(date, doctor_id).await,
            (None, Some(doctor_id)) => self.conflict_service.doctor_appointments(doctor_id).await,
            (None, None) => self.list_appointments().await,
        }
    }

    async fn verify_patient_exists(&self, patient_id: i64) -> Result<(), AppointmentError> {
        self.patient_service
            .get_patient(patient_id)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                PatientError::NotFound => AppointmentError::PatientNotFound,
                other => AppointmentError::DatabaseError(other.to_string()),
            })
    }

    async fn verify_doctor_bookable(&self, doctor_id: i64) -> Result<Doctor, AppointmentError> {
        let doctor = self.doctor_service
            .get_doctor(doctor_id)
            .await
            .map_err(|e| match e {
                DoctorError::NotFound => AppointmentError::DoctorNotFound,
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        if !doctor.is_bookable() {
            warn!("Doctor {} is inactive and cannot take appointments", doctor_id);
            return Err(AppointmentError::DoctorInactive);
        }

        Ok(doctor)
    }

    async fn insert_appointment(
        &self,
        patient_id: i64,
        doctor_id: i64,
        start_time: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<Appointment, AppointmentError> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            INSERT INTO appointments (patient_id, doctor_id, start_time_utc, duration_minutes)
            VALUES (?, ?, ?, ?)
            RETURNING id, patient_id, doctor_id, start_time_utc, duration_minutes
            "#,
        )
        .bind(patient_id)
        .bind(doctor_id)
        .bind(timestamps::to_storage(start_time))
        .bind(duration_minutes)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| AppointmentError::DatabaseError(format!("Failed to create appointment: {}", e)))?;

        Ok(Appointment::from(row))
    }
}
