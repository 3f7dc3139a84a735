use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use shared_database::Database;

use crate::models::{Appointment, AppointmentError, AppointmentRow};

/// Two half-open windows `[start1, end1)` and `[start2, end2)` overlap if
/// `start1 < end2 AND start2 < end1`. Touching windows do not overlap.
pub fn appointments_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

/// First existing appointment whose window overlaps `[start, end)`.
pub fn first_conflict(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Appointment],
) -> Option<&Appointment> {
    existing.iter().find(|appointment| {
        appointments_overlap(start, end, appointment.start_time_utc, appointment.end_time_utc())
    })
}

pub struct ConflictDetectionService {
    db: Database,
}

impl ConflictDetectionService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Every appointment booked with the doctor, ordered by start time.
    pub async fn doctor_appointments(&self, doctor_id: i64) -> Result<Vec<Appointment>, AppointmentError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, patient_id, doctor_id, start_time_utc, duration_minutes
            FROM appointments
            WHERE doctor_id = ?
            ORDER BY start_time_utc, id
            "#,
        )
        .bind(doctor_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Scan the doctor's whole book for an appointment overlapping the window.
    pub async fn check_conflicts(
        &self,
        doctor_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppointmentError> {
        debug!("Checking conflicts for doctor {} from {} to {}", doctor_id, start_time, end_time);

        let existing = self.doctor_appointments(doctor_id).await?;
        let conflict = first_conflict(start_time, end_time, &existing).cloned();

        if let Some(appointment) = &conflict {
            warn!(
                "Conflict detected for doctor {}: appointment {} runs {} to {}",
                doctor_id,
                appointment.id,
                appointment.start_time_utc,
                appointment.end_time_utc()
            );
        }

        Ok(conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2099, 1, 1, hour, minute, 0).unwrap()
    }

    fn booked(id: i64, hour: u32, minute: u32, duration_minutes: i64) -> Appointment {
        Appointment {
            id,
            patient_id: 1,
            doctor_id: 1,
            start_time_utc: at(hour, minute),
            duration_minutes,
        }
    }

    #[test]
    fn test_overlap_law() {
        let (s1, e1) = (at(10, 0), at(10, 30));

        // partial overlap on either side
        assert!(appointments_overlap(s1, e1, at(10, 15), at(10, 45)));
        assert!(appointments_overlap(s1, e1, at(9, 45), at(10, 15)));
        // containment both ways
        assert!(appointments_overlap(s1, e1, at(10, 5), at(10, 10)));
        assert!(appointments_overlap(s1, e1, at(9, 0), at(11, 0)));
        // identical windows
        assert!(appointments_overlap(s1, e1, s1, e1));
    }

    #[test]
    fn test_back_to_back_windows_do_not_overlap() {
        let (s1, e1) = (at(10, 0), at(10, 30));

        assert!(!appointments_overlap(s1, e1, at(10, 30), at(11, 0)));
        assert!(!appointments_overlap(s1, e1, at(9, 30), at(10, 0)));
    }

    #[test]
    fn test_new_window_before_existing_does_not_overlap() {
        // new booking ends well before the existing one starts
        assert!(!appointments_overlap(at(8, 0), at(8, 30), at(10, 0), at(10, 30)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let windows = [
            (at(9, 0), at(9, 30)),
            (at(9, 15), at(10, 0)),
            (at(9, 30), at(9, 45)),
            (at(8, 0), at(12, 0)),
        ];

        for &(s1, e1) in &windows {
            for &(s2, e2) in &windows {
                assert_eq!(
                    appointments_overlap(s1, e1, s2, e2),
                    appointments_overlap(s2, e2, s1, e1)
                );
                assert_eq!(appointments_overlap(s1, e1, s2, e2), !(s2 >= e1 || e2 <= s1));
            }
        }
    }

    #[test]
    fn test_first_conflict_scans_all_appointments() {
        let existing = vec![booked(1, 8, 0, 30), booked(2, 10, 0, 30), booked(3, 10, 20, 60)];

        let found = first_conflict(at(10, 15), at(10, 45), &existing).map(|a| a.id);
        assert_eq!(found, Some(2));

        let found = first_conflict(at(11, 0), at(11, 10), &existing).map(|a| a.id);
        assert_eq!(found, Some(3));

        assert!(first_conflict(at(10, 0), at(10, 30), &[]).is_none());
        // fits exactly between appointments 1 and 2
        assert!(first_conflict(at(8, 30), at(10, 0), &existing).is_none());
    }
}
