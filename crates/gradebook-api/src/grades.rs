//! Handlers for grading and aggregates.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `PUT`  | `/grades` | Body: `{"student_id":"…","assessment_id":"…","score":18,"feedback":null}` |
//! | `POST` | `/grades/bulk` | Body: `[{"submission_id":"…","score":9}, …]`; always 200 |
//! | `GET`  | `/classes/{id}/students/{student_id}/aggregate` | |
//! | `GET`  | `/classes/{id}/summary` | Active students only |

use std::sync::Arc;

use axum::extract::State;
use gradebook_core::{
  aggregate::{ClassSummary, StudentAggregate},
  grade::GradeEntry,
  ops::{self, BulkGradeItem, BulkResult, RecordGrade},
  store::GradeStore,
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Instructor, Json, Path},
};

/// `PUT /grades`
pub async fn record<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Json(body): Json<RecordGrade>,
) -> Result<Json<GradeEntry>, ApiError> {
  Ok(Json(ops::record_grade(store.as_ref(), &ctx, body).await?))
}

/// `POST /grades/bulk`. Per-item failures are reported in the body.
pub async fn bulk<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Json(items): Json<Vec<BulkGradeItem>>,
) -> Json<BulkResult> {
  Json(ops::bulk_grade(store.as_ref(), &ctx, items).await)
}

/// `GET /classes/{id}/students/{student_id}/aggregate`
pub async fn student_aggregate<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path((class_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StudentAggregate>, ApiError> {
  let aggregate =
    ops::aggregate_student(store.as_ref(), &ctx, class_id, student_id).await?;
  Ok(Json(aggregate))
}

/// `GET /classes/{id}/summary`
pub async fn class_summary<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(class_id): Path<Uuid>,
) -> Result<Json<ClassSummary>, ApiError> {
  Ok(Json(ops::aggregate_class(store.as_ref(), &ctx, class_id).await?))
}
