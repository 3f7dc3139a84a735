use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shared_database::timestamps;
use shared_utils::extractor::Validate;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub start_time_utc: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl Appointment {
    /// End of the booked window. Saturates at the latest representable
    /// instant so an absurd stored duration still blocks everything after it.
    pub fn end_time_utc(&self) -> DateTime<Utc> {
        window_end(self.start_time_utc, self.duration_minutes).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// `start + minutes`, or `None` when the duration cannot be represented.
pub fn window_end(start: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_minutes(minutes).and_then(|delta| start.checked_add_signed(delta))
}

/// Appointment as stored: the start instant carries no offset and is UTC.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentRow {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub start_time_utc: NaiveDateTime,
    pub duration_minutes: i64,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            start_time_utc: timestamps::from_storage(row.start_time_utc),
            duration_minutes: row.duration_minutes,
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    /// Must carry an explicit offset; naive timestamps fail to decode.
    #[serde(alias = "start_time")]
    pub start_time_utc: DateTime<FixedOffset>,
    #[serde(alias = "duration")]
    pub duration_minutes: i64,
}

impl Validate for CreateAppointmentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.duration_minutes <= 0 {
            return Err("duration_minutes must be a positive number of minutes".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentResponse {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub start_time_utc: DateTime<Utc>,
    pub end_time_utc: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl From<&Appointment> for AppointmentResponse {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            start_time_utc: appointment.start_time_utc,
            end_time_utc: appointment.end_time_utc(),
            duration_minutes: appointment.duration_minutes,
        }
    }
}

/// `GET /appointments` filters. `date` is a UTC calendar day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentListQuery {
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<i64>,
}

impl Validate for AppointmentListQuery {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found.")]
    NotFound,

    #[error("Patient not found.")]
    PatientNotFound,

    #[error("Doctor not found.")]
    DoctorNotFound,

    #[error("Doctor is not active.")]
    DoctorInactive,

    #[error("{0}")]
    InvalidTime(String),

    #[error("Doctor has a conflicting appointment.")]
    ConflictDetected { conflicting_appointment_id: i64 },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_requires_offset() {
        let naive = serde_json::json!({
            "patient_id": 1,
            "doctor_id": 1,
            "start_time_utc": "2026-02-02T10:00:00",
            "duration_minutes": 30
        });
        assert!(serde_json::from_value::<CreateAppointmentRequest>(naive).is_err());

        let aware = serde_json::json!({
            "patient_id": 1,
            "doctor_id": 1,
            "start_time": "2026-02-02T10:00:00+05:30",
            "duration": 30
        });
        let request: CreateAppointmentRequest = serde_json::from_value(aware).unwrap();
        assert_eq!(request.start_time_utc.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(request.duration_minutes, 30);
    }

    #[test]
    fn test_non_positive_duration_fails_validation() {
        let mut request = CreateAppointmentRequest {
            patient_id: 1,
            doctor_id: 1,
            start_time_utc: DateTime::parse_from_rfc3339("2099-01-01T10:00:00Z").unwrap(),
            duration_minutes: 0,
        };
        assert!(request.validate().is_err());

        request.duration_minutes = -15;
        assert!(request.validate().is_err());

        request.duration_minutes = 1;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_row_is_read_back_as_utc() {
        let row = AppointmentRow {
            id: 1,
            patient_id: 2,
            doctor_id: 3,
            start_time_utc: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 30,
        };

        let appointment = Appointment::from(row);
        assert_eq!(appointment.start_time_utc, Utc.with_ymd_and_hms(2099, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(appointment.end_time_utc(), Utc.with_ymd_and_hms(2099, 1, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_response_serializes_utc_instants() {
        let appointment = Appointment {
            id: 9,
            patient_id: 1,
            doctor_id: 2,
            start_time_utc: Utc.with_ymd_and_hms(2099, 1, 1, 23, 45, 0).unwrap(),
            duration_minutes: 30,
        };

        let value = serde_json::to_value(AppointmentResponse::from(&appointment)).unwrap();
        assert_eq!(value["start_time_utc"], "2099-01-01T23:45:00Z");
        assert_eq!(value["end_time_utc"], "2099-01-02T00:15:00Z");
    }

    #[test]
    fn test_end_time_saturates() {
        let appointment = Appointment {
            id: 1,
            patient_id: 1,
            doctor_id: 1,
            start_time_utc: Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap(),
            duration_minutes: i64::MAX,
        };
        assert_eq!(appointment.end_time_utc(), DateTime::<Utc>::MAX_UTC);
        assert_eq!(window_end(appointment.start_time_utc, i64::MAX), None);
    }
}
