//! Handlers for quiz questions.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/quizzes/{id}/questions` | In position order |
//! | `POST` | `/quizzes/{id}/questions` | Body: one question |
//! | `POST` | `/quizzes/{id}/questions/import` | Raw bank; `?format=csv\|json\|xml` or inferred from `Content-Type` |

use std::sync::Arc;

use axum::{
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use gradebook_core::{
  ops,
  question::{NewQuestion, Question},
  store::GradeStore,
};
use gradebook_quiz::{ImportFormat, ImportSummary, import_questions};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Instructor, Json, Path, Query},
};

/// `GET /quizzes/{id}/questions`
pub async fn list<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(assessment_id): Path<Uuid>,
) -> Result<Json<Vec<Question>>, ApiError> {
  let questions =
    ops::list_questions(store.as_ref(), &ctx, assessment_id).await?;
  Ok(Json(questions))
}

/// `POST /quizzes/{id}/questions`
pub async fn add<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(assessment_id): Path<Uuid>,
  Json(body): Json<NewQuestion>,
) -> Result<impl IntoResponse, ApiError> {
  let question =
    ops::add_question(store.as_ref(), &ctx, assessment_id, body).await?;
  Ok((StatusCode::CREATED, Json(question)))
}

// ─── Import ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImportParams {
  pub format: Option<String>,
}

fn format_from_content_type(headers: &HeaderMap) -> Option<ImportFormat> {
  let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
  let mime = content_type.split(';').next()?.trim();
  match mime {
    "text/csv" => Some(ImportFormat::Csv),
    "application/json" => Some(ImportFormat::Json),
    "application/xml" | "text/xml" => Some(ImportFormat::Xml),
    _ => None,
  }
}

/// `POST /quizzes/{id}/questions/import[?format=<format>]`
pub async fn import<S: GradeStore>(
  State(store): State<Arc<S>>,
  Instructor(ctx): Instructor,
  Path(assessment_id): Path<Uuid>,
  Query(params): Query<ImportParams>,
  headers: HeaderMap,
  body: String,
) -> Result<Json<ImportSummary>, ApiError> {
  let format = match params.format {
    Some(name) => ImportFormat::from_name(&name)?,
    None => format_from_content_type(&headers).ok_or_else(|| {
      ApiError::BadRequest(
        "import format is required (?format=csv|json|xml)".into(),
      )
    })?,
  };
  let summary =
    import_questions(store.as_ref(), &ctx, assessment_id, format, &body)
      .await?;
  Ok(Json(summary))
}
