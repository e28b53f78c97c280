//! Request extractors that speak the API's error envelope

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Path, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// JSON body that has been deserialized and run through `validator`
///
/// Undecodable bodies become `400 INVALID_REQUEST`, rule violations
/// `400 VALIDATION_ERROR` naming the first offending field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!(error = %rejection, "Rejected request body");
            ApiError::BadRequest("Invalid request body".to_string())
        })?;

        value.validate().map_err(validation_error)?;
        Ok(ValidatedJson(value))
    }
}

/// Collapse validator output into a single field error; fields are sorted so
/// the reported one is stable
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        })
        .collect();
    fields.sort();

    match fields.into_iter().next() {
        Some((field, message)) => ApiError::Validation {
            field: Some(field),
            message,
        },
        None => ApiError::validation("Validation failed"),
    }
}

/// Task id path segment; anything that is not a UUID is `400 INVALID_TASK_ID`
#[derive(Debug, Clone, Copy)]
pub struct TaskId(pub Uuid);

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for TaskId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidTaskId)?;

        Uuid::parse_str(&raw)
            .map(TaskId)
            .map_err(|_| ApiError::InvalidTaskId)
    }
}
