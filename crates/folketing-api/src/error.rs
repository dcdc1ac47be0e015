//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folketing_core::FieldError;
use serde_json::json;
use thiserror::Error;

use crate::Environment;

/// Shown instead of store detail when running in production.
pub const GENERIC_MESSAGE: &str = "Something went wrong!";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed")]
  Validation(Vec<FieldError>),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// Message is already redacted for the environment it was built in.
  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Map a gateway error to its HTTP form.
  pub fn from_core(err: folketing_core::Error, environment: Environment) -> Self {
    use folketing_core::Error;

    match err {
      Error::Validation(errors) => ApiError::Validation(errors),
      Error::NotFound(m) => ApiError::NotFound(m),
      e @ (Error::InvalidIdentifier(_)
      | Error::Conflict { .. }
      | Error::InvalidArgument(_)) => ApiError::BadRequest(e.to_string()),
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        ApiError::internal(e.to_string(), environment)
      }
    }
  }

  pub fn internal(detail: String, environment: Environment) -> Self {
    if environment.is_production() {
      ApiError::Internal(GENERIC_MESSAGE.to_owned())
    } else {
      ApiError::Internal(detail)
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::Validation(errors) => (
        StatusCode::BAD_REQUEST,
        json!({ "success": false, "error": "Validation failed", "errors": errors }),
      ),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, json!({ "success": false, "error": m }))
      }
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, json!({ "success": false, "error": m }))
      }
      ApiError::Internal(m) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "success": false, "error": "Internal Server Error", "message": m }),
      ),
    };
    (status, Json(body)).into_response()
  }
}
