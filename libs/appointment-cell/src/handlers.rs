// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_utils::extractor::{ValidatedJson, ValidatedPath, ValidatedQuery};

use crate::models::{
    AppointmentError, AppointmentListQuery, AppointmentResponse, CreateAppointmentRequest,
};
use crate::router::AppointmentState;
use crate::services::booking::AppointmentBookingService;

fn appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound
        | AppointmentError::PatientNotFound
        | AppointmentError::DoctorNotFound => AppError::NotFound(e.to_string()),
        AppointmentError::DoctorInactive => AppError::InvalidState(e.to_string()),
        AppointmentError::InvalidTime(msg) => AppError::BadRequest(msg),
        AppointmentError::ConflictDetected { .. } => AppError::Conflict(e.to_string()),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppointmentState>,
    ValidatedJson(request): ValidatedJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = AppointmentBookingService::new(&state.db, state.locks.clone());

    let appointment = booking_service.create_appointment(request)
        .await
        .map_err(appointment_error)?;

    Ok((StatusCode::CREATED, Json(json!(AppointmentResponse::from(&appointment)))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentState>,
    ValidatedPath(appointment_id): ValidatedPath<i64>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state.db, state.locks.clone());

    let appointment = booking_service.get_appointment(appointment_id)
        .await
        .map_err(appointment_error)?;

    Ok(Json(json!(AppointmentResponse::from(&appointment))))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
    ValidatedQuery(query): ValidatedQuery<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state.db, state.locks.clone());

    let appointments = booking_service.search_appointments(query)
        .await
        .map_err(appointment_error)?;

    let response: Vec<AppointmentResponse> = appointments.iter().map(AppointmentResponse::from).collect();

    Ok(Json(json!(response)))
}
