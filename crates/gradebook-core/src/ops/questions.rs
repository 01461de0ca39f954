//! Quiz question management.

use tracing::info;
use uuid::Uuid;

use crate::{
  Error, InstructorContext, Result,
  assessment::{Assessment, AssessmentKind},
  question::{NewQuestion, Question},
  store::GradeStore,
};

use super::authz::owned_assessment;

async fn owned_quiz<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  assessment_id: Uuid,
) -> Result<Assessment> {
  let assessment = owned_assessment(store, ctx, assessment_id).await?;
  if assessment.kind != AssessmentKind::Quiz {
    return Err(Error::Validation(format!(
      "Assessment {assessment_id} is not a quiz"
    )));
  }
  Ok(assessment)
}

/// Validate and append questions to a quiz.
///
/// All-or-nothing: one invalid question rejects the whole call. The bulk
/// importer filters bad rows out before calling this.
pub async fn add_questions<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  assessment_id: Uuid,
  questions: Vec<NewQuestion>,
) -> Result<Vec<Question>> {
  owned_quiz(store, ctx, assessment_id).await?;
  let questions = questions
    .into_iter()
    .map(NewQuestion::normalized)
    .collect::<Result<Vec<_>>>()?;
  if questions.is_empty() {
    return Ok(Vec::new());
  }

  let stored = store
    .add_questions(assessment_id, questions)
    .await
    .map_err(Error::store)?;
  info!(%assessment_id, added = stored.len(), "quiz questions added");
  Ok(stored)
}

/// Append a single question to a quiz.
pub async fn add_question<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  assessment_id: Uuid,
  question: NewQuestion,
) -> Result<Question> {
  add_questions(store, ctx, assessment_id, vec![question])
    .await?
    .pop()
    .ok_or_else(|| Error::validation("Question was not stored"))
}

pub async fn list_questions<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  assessment_id: Uuid,
) -> Result<Vec<Question>> {
  owned_quiz(store, ctx, assessment_id).await?;
  store
    .list_questions(assessment_id)
    .await
    .map_err(Error::store)
}
