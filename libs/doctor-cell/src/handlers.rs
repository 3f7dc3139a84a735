use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::Database;
use shared_models::error::AppError;
use shared_utils::extractor::{ValidatedJson, ValidatedPath, ValidatedQuery};

use crate::models::{CreateDoctorRequest, DoctorError, DoctorListQuery};
use crate::services::DoctorService;

fn doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::NotFound => AppError::NotFound(e.to_string()),
        DoctorError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(db): State<Database>,
    ValidatedJson(request): ValidatedJson<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_service = DoctorService::new(&db);

    let doctor = doctor_service.create_doctor(request)
        .await
        .map_err(doctor_error)?;

    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(db): State<Database>,
    ValidatedPath(doctor_id): ValidatedPath<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&db);

    let doctor = doctor_service.get_doctor(doctor_id)
        .await
        .map_err(doctor_error)?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(db): State<Database>,
    ValidatedQuery(query): ValidatedQuery<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&db);

    let doctors = doctor_service.list_doctors(query)
        .await
        .map_err(doctor_error)?;

    Ok(Json(json!(doctors)))
}
