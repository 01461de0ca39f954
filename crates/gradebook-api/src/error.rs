//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Every variant renders as
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<gradebook_core::Error> for ApiError {
  fn from(e: gradebook_core::Error) -> Self {
    use gradebook_core::Error as E;
    match e {
      E::Validation(m) => ApiError::Validation(m),
      E::Authorization(m) => ApiError::Forbidden(m),
      E::Store(e) => ApiError::Store(e),
      e if e.is_not_found() => ApiError::NotFound(e.to_string()),
      e => ApiError::Store(Box::new(e)),
    }
  }
}

impl From<gradebook_quiz::Error> for ApiError {
  fn from(e: gradebook_quiz::Error) -> Self {
    match e {
      gradebook_quiz::Error::Core(e) => e.into(),
      e => ApiError::BadRequest(e.to_string()),
    }
  }
}

// Extractor rejections, so malformed requests get the same JSON shape.

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}
