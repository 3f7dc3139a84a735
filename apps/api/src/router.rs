use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use shared_database::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/patients", patient_routes(db.clone()))
        .nest("/doctors", doctor_routes(db.clone()))
        .nest("/appointments", appointment_routes(db))
}
