//! Request extractors that reject with [`AppError`] instead of axum's defaults

use crate::core::error::{AppError, ValidationError};
use crate::core::validation::validators;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// JSON body extractor
///
/// Malformed or mistyped bodies are rejected as `400 INVALID_JSON` with the
/// usual error envelope, rather than axum's plain-text 415/422.
///
/// ```rust,ignore
/// pub async fn create(
///     State(state): State<AppState>,
///     JsonBody(input): JsonBody<NewTenant>,
/// ) -> AppResult<Json<Tenant>> {
///     ...
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ValidationError::InvalidJson {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}

/// Query string extractor
///
/// Undecodable query strings (a repeated `?month=`, say) are rejected as
/// `400 VALIDATION_ERROR` on the `query` field.
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ValidationError::field("query", &rejection.body_text()).into()),
        }
    }
}

/// Parse a record id taken from the path
pub fn path_id(raw: &str) -> Result<Uuid, AppError> {
    Ok(validators::uuid(raw)?)
}
