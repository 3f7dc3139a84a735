use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::Database;
use shared_models::error::AppError;
use shared_utils::extractor::{ValidatedJson, ValidatedPath};

use crate::models::{CreatePatientRequest, PatientError};
use crate::services::PatientService;

fn patient_error(e: PatientError) -> AppError {
    match e {
        PatientError::NotFound => AppError::NotFound(e.to_string()),
        PatientError::EmailAlreadyExists { .. } => AppError::Conflict(e.to_string()),
        PatientError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_patient(
    State(db): State<Database>,
    ValidatedJson(request): ValidatedJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&db);

    let patient = service.create_patient(request)
        .await
        .map_err(patient_error)?;

    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(db): State<Database>,
    ValidatedPath(patient_id): ValidatedPath<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&db);

    let patient = service.get_patient(patient_id)
        .await
        .map_err(patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(db): State<Database>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&db);

    let patients = service.list_patients()
        .await
        .map_err(patient_error)?;

    Ok(Json(json!(patients)))
}
