use axum::{routing::get, Router};

use shared_database::Database;

use crate::handlers;

pub fn doctor_routes(db: Database) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::create_doctor))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .with_state(db)
}
