// libs/appointment-cell/src/services/consistency.rs
//
// Per-doctor scheduling locks. Admissions for one doctor run the conflict scan
// and the insert while holding that doctor's lock, so two overlapping requests
// can never both pass the scan.
//

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Default)]
pub struct SchedulingLocks {
    doctors: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl SchedulingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive scheduling rights on the doctor's book.
    ///
    /// The guard releases the lock on drop. Different doctors never contend.
    pub async fn lock_doctor(&self, doctor_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            // the map is only touched for the entry lookup, never across an await
            let mut doctors = self.doctors.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(doctors.entry(doctor_id).or_default())
        };

        debug!("Waiting for scheduling lock on doctor {}", doctor_id);
        lock.lock_owned().await
    }

    pub fn tracked_doctors(&self) -> usize {
        self.doctors.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}
