//! Handlers for assessments and submissions.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/classes/{id}/assessments` | Optional `?kind=assignment\|quiz` |
//! | `POST` | `/classes/{id}/assessments` | Body: `{"kind":"quiz","title":"…","max_points":20}` |
//! | `POST` | `/assessments/{id}/submissions` | Body: `{"student_id":"…","notes":null}` |

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use gradebook_core::{
  assessment::{Assessment, AssessmentKind, NewAssessment, NewSubmission},
  ops,
  store::GradeStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Instructor, Json, Path, Query},
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub kind: Option<AssessmentKind>,
}

/// `GET /classes/{id}/assessments[?kind=<kind>]`
pub async fn list<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(class_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Assessment>>, ApiError> {
  let assessments =
    ops::list_assessments(store.as_ref(), &ctx, class_id, params.kind).await?;
  Ok(Json(assessments))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub kind:       AssessmentKind,
  pub title:      String,
  pub max_points: f64,
  #[serde(default)]
  pub due_at:     Option<DateTime<Utc>>,
}

/// `POST /classes/{id}/assessments`
pub async fn create<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(class_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let assessment = ops::create_assessment(store.as_ref(), &ctx, NewAssessment {
    class_id,
    kind: body.kind,
    title: body.title,
    max_points: body.max_points,
    due_at: body.due_at,
  })
  .await?;
  Ok((StatusCode::CREATED, Json(assessment)))
}

// ─── Submissions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmissionBody {
  pub student_id: Uuid,
  #[serde(default)]
  pub notes:      Option<String>,
}

/// `POST /assessments/{id}/submissions`
pub async fn submit<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(assessment_id): Path<Uuid>,
  Json(body): Json<SubmissionBody>,
) -> Result<impl IntoResponse, ApiError> {
  let submission = ops::record_submission(store.as_ref(), &ctx, NewSubmission {
    assessment_id,
    student_id: body.student_id,
    notes: body.notes,
  })
  .await?;
  Ok((StatusCode::CREATED, Json(submission)))
}
