//! Request extractors.
//!
//! [`Instructor`] reads the caller's identity from the header set by the
//! upstream authenticator. [`Json`], [`Query`] and [`Path`] wrap the axum
//! extractors so their rejections come back as [`ApiError`] JSON.

use axum::{
  extract::{FromRequest, FromRequestParts},
  http::request::Parts,
  response::{IntoResponse, Response},
};
use gradebook_core::InstructorContext;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated instructor's id.
pub const INSTRUCTOR_HEADER: &str = "x-instructor-id";

/// The authenticated instructor for this request.
pub struct Instructor(pub InstructorContext);

impl<S> FromRequestParts<S> for Instructor
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let value = parts.headers.get(INSTRUCTOR_HEADER).ok_or_else(|| {
      ApiError::Unauthorized(format!("missing {INSTRUCTOR_HEADER} header"))
    })?;
    let instructor_id = value
      .to_str()
      .ok()
      .and_then(|v| Uuid::parse_str(v.trim()).ok())
      .ok_or_else(|| {
        ApiError::Unauthorized(format!("malformed {INSTRUCTOR_HEADER} header"))
      })?;
    Ok(Instructor(InstructorContext::new(instructor_id)))
  }
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
  fn into_response(self) -> Response { axum::Json(self.0).into_response() }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request};

  use super::*;

  async fn extract(req: Request<Body>) -> Result<Instructor, ApiError> {
    let (mut parts, _) = req.into_parts();
    Instructor::from_request_parts(&mut parts, &()).await
  }

  #[tokio::test]
  async fn valid_header() {
    let id = Uuid::new_v4();
    let req = Request::builder()
      .header(INSTRUCTOR_HEADER, id.to_string())
      .body(Body::empty())
      .unwrap();
    let Instructor(ctx) = extract(req).await.unwrap();
    assert_eq!(ctx.instructor_id, id);
  }

  #[tokio::test]
  async fn missing_header() {
    let req = Request::builder().body(Body::empty()).unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized(_))));
  }

  #[tokio::test]
  async fn malformed_header() {
    let req = Request::builder()
      .header(INSTRUCTOR_HEADER, "instructor-7")
      .body(Body::empty())
      .unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized(_))));
  }
}
