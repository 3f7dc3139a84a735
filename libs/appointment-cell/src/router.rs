// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::Database;

use crate::handlers;
use crate::services::consistency::SchedulingLocks;

/// Shared by every appointment request. The lock table must outlive single
/// requests, so it is created once per router.
#[derive(Clone)]
pub struct AppointmentState {
    pub db: Database,
    pub locks: Arc<SchedulingLocks>,
}

impl AppointmentState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            locks: Arc::new(SchedulingLocks::new()),
        }
    }
}

pub fn appointment_routes(db: Database) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::create_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .with_state(AppointmentState::new(db))
}
