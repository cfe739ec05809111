// Bookshelf - Personal Library Catalog
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP error mapping
//!
//! Every handler returns `ApiResult<T>`; a `CatalogError` becomes a JSON body
//! `{"error": ..., "code": ...}` with the matching status code.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, ConstraintKind};

/// Result type for HTTP handlers
pub type ApiResult<T> = std::result::Result<T, CatalogError>;

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl CatalogError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,

            CatalogError::MissingRequiredField(_) | CatalogError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }

            CatalogError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                ..
            } => StatusCode::CONFLICT,
            CatalogError::ConstraintViolation { .. } => StatusCode::BAD_REQUEST,

            CatalogError::DatabaseError(_)
            | CatalogError::MigrationFailed(_)
            | CatalogError::ConfigurationError(_)
            | CatalogError::SqlxError(_)
            | CatalogError::SerdeJsonError(_)
            | CatalogError::CsvError(_)
            | CatalogError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&CatalogError> for ErrorResponse {
    fn from(err: &CatalogError) -> Self {
        let status = err.status_code();
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self {
            error,
            code: status.as_u16(),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

/// JSON body extractor whose rejections use the catalog error format
///
/// The body is read as a JSON value first, so a missing content type or
/// malformed JSON is `InvalidInput`. Converting the value into `T` then
/// reports a missing key as `MissingRequiredField` and any other shape
/// mismatch as `InvalidInput`. All are 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| CatalogError::invalid_input(rejection.body_text()))?;

        serde_json::from_value(value)
            .map(ApiJson)
            .map_err(|e| data_error(&e))
    }
}

/// Path parameter extractor; a malformed id is `InvalidInput`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(CatalogError::invalid_input(rejection.body_text())),
        }
    }
}

/// Query string extractor; an undecodable query is `InvalidInput`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(CatalogError::invalid_input(rejection.body_text())),
        }
    }
}

fn data_error(err: &serde_json::Error) -> CatalogError {
    let message = err.to_string();
    match missing_field_name(&message) {
        Some(field) => CatalogError::missing_field(field),
        None => CatalogError::invalid_input(message),
    }
}

/// Pull `x` out of serde's "missing field `x`" message
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}
