use axum::{routing::get, Router};

use shared_database::Database;

use crate::handlers::*;

pub fn patient_routes(db: Database) -> Router {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route("/{id}", get(get_patient))
        .with_state(db)
}
