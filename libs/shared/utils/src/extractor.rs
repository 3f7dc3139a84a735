use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use shared_models::error::AppError;

/// Field-level checks run after a request body or query has been decoded.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// JSON body that is decoded and then validated.
///
/// Undecodable bodies and failed checks are rejected with 422 before any
/// handler logic runs.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate().map_err(|msg| {
            debug!("Request body failed validation: {}", msg);
            AppError::ValidationError(msg)
        })?;

        Ok(Self(value))
    }
}

/// Query string that is decoded and then validated, rejected with 422.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;

        value.validate().map_err(AppError::ValidationError)?;

        Ok(Self(value))
    }
}

/// Path parameters whose decode failures are rejected with 422 and a JSON body.
#[derive(Debug)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;

        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    debug!("Rejected request body: {}", rejection.body_text());
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            AppError::ValidationError(rejection.body_text())
        }
        _ => AppError::BadRequest(rejection.body_text()),
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    debug!("Rejected query string: {}", rejection.body_text());
    AppError::ValidationError(rejection.body_text())
}

fn path_rejection(rejection: PathRejection) -> AppError {
    debug!("Rejected path parameters: {}", rejection.body_text());
    match rejection {
        PathRejection::FailedToDeserializePathParams(_) => AppError::ValidationError(rejection.body_text()),
        _ => AppError::Internal(rejection.body_text()),
    }
}
