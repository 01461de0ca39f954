//! Handlers for classes, students and rosters.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/classes` | Caller's classes, by name |
//! | `POST` | `/classes` | Body: `{"name":"Biology 101"}` |
//! | `POST` | `/students` | Body: `{"name":"Ada","email":null}` |
//! | `GET`  | `/classes/{id}/roster` | Optional `?status=active\|dropped&sort=name_asc\|…` |
//! | `POST` | `/classes/{id}/roster` | Body: `{"student_id":"…"}`; re-activates a dropped student |
//! | `PUT`  | `/classes/{id}/roster/{student_id}` | Body: `{"status":"dropped"}` |

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use gradebook_core::{
  class::{
    Class, Enrollment, EnrollmentStatus, NewStudent, RosterEntry, RosterQuery,
    RosterSort,
  },
  ops,
  store::GradeStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Instructor, Json, Path, Query},
};

// ─── Classes ─────────────────────────────────────────────────────────────────

/// `GET /classes`
pub async fn list<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
) -> Result<Json<Vec<Class>>, ApiError> {
  Ok(Json(ops::list_classes(store.as_ref(), &ctx).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateClassBody {
  pub name: String,
}

/// `POST /classes`
pub async fn create<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Json(body): Json<CreateClassBody>,
) -> Result<impl IntoResponse, ApiError> {
  let class = ops::create_class(store.as_ref(), &ctx, &body.name).await?;
  Ok((StatusCode::CREATED, Json(class)))
}

// ─── Students ────────────────────────────────────────────────────────────────

/// `POST /students`. Any instructor may register a student; access to their
/// grades still goes through class enrollment.
pub async fn add_student<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(_): Instructor,
  Json(body): Json<NewStudent>,
) -> Result<impl IntoResponse, ApiError> {
  let student = ops::add_student(store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(student)))
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RosterParams {
  pub status: Option<EnrollmentStatus>,
  #[serde(default)]
  pub sort:   RosterSort,
}

/// `GET /classes/{id}/roster`
pub async fn roster<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(class_id): Path<Uuid>,
  Query(params): Query<RosterParams>,
) -> Result<Json<Vec<RosterEntry>>, ApiError> {
  let query = RosterQuery {
    class_id,
    status: params.status,
    sort: params.sort,
  };
  Ok(Json(ops::list_roster(store.as_ref(), &ctx, query).await?))
}

#[derive(Debug, Deserialize)]
pub struct EnrollBody {
  pub student_id: Uuid,
}

/// `POST /classes/{id}/roster`
pub async fn enroll<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(class_id): Path<Uuid>,
  Json(body): Json<EnrollBody>,
) -> Result<Json<Enrollment>, ApiError> {
  let enrollment =
    ops::enroll(store.as_ref(), &ctx, class_id, body.student_id).await?;
  Ok(Json(enrollment))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: EnrollmentStatus,
}

/// `PUT /classes/{id}/roster/{student_id}`
pub async fn set_status<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path((class_id, student_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Enrollment>, ApiError> {
  let enrollment = ops::set_enrollment_status(
    store.as_ref(),
    &ctx,
    class_id,
    student_id,
    body.status,
  )
  .await?;
  Ok(Json(enrollment))
}
