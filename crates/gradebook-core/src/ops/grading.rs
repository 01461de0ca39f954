//! Recording grades and computing aggregates.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, InstructorContext, Result,
  aggregate::{ClassSummary, StudentAggregate, StudentRow, group_by_student, summarize_class},
  class::RosterQuery,
  grade::{GradeEntry, validate_score},
  store::GradeStore,
};

use super::authz::{enrollment, owned_assessment, owned_class};

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RecordGrade {
  pub student_id:    Uuid,
  pub assessment_id: Uuid,
  pub score:         f64,
  #[serde(default)]
  pub feedback:      Option<String>,
}

/// Record (or overwrite) one student's grade on one assessment.
///
/// Fails with [`Error::Authorization`] unless the caller owns the
/// assessment's class, and with [`Error::Validation`] when the student is
/// not enrolled or the score is outside `0..=max_points`.
pub async fn record_grade<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  input: RecordGrade,
) -> Result<GradeEntry> {
  let assessment = owned_assessment(store, ctx, input.assessment_id).await?;

  match enrollment(store, assessment.class_id, input.student_id).await {
    Ok(_) => {}
    Err(e @ Error::EnrollmentNotFound { .. }) => {
      return Err(Error::Validation(e.to_string()));
    }
    Err(e) => return Err(e),
  }
  validate_score(input.score, assessment.max_points)?;

  let entry =
    GradeEntry::new(input.student_id, &assessment, input.score, input.feedback);
  let stored = store
    .upsert_grade(entry, assessment.kind)
    .await
    .map_err(Error::store)?;

  info!(
    student_id = %stored.student_id,
    assessment_id = %stored.assessment_id,
    score = stored.score,
    letter = %stored.letter,
    "grade recorded"
  );
  Ok(stored)
}

// ─── Bulk ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BulkGradeItem {
  pub submission_id: Uuid,
  pub score:         f64,
  #[serde(default)]
  pub feedback:      Option<String>,
}

/// Outcome of [`bulk_grade`]. `errors` has one line per failed item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResult {
  pub succeeded: usize,
  pub failed:    usize,
  pub errors:    Vec<String>,
}

/// Grade a batch of submissions. Each item is applied on its own; a failure
/// is reported in the result and the remaining items still run.
pub async fn bulk_grade<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  items: Vec<BulkGradeItem>,
) -> BulkResult {
  let mut result = BulkResult::default();

  for item in items {
    let submission_id = item.submission_id;
    match grade_submission(store, ctx, item).await {
      Ok(_) => result.succeeded += 1,
      Err(e) => {
        warn!(%submission_id, error = %e, "bulk grade item failed");
        result.failed += 1;
        result.errors.push(format!("Submission #{submission_id}: {e}"));
      }
    }
  }

  info!(
    succeeded = result.succeeded,
    failed = result.failed,
    "bulk grading finished"
  );
  result
}

async fn grade_submission<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  item: BulkGradeItem,
) -> Result<GradeEntry> {
  let submission = store
    .get_submission(item.submission_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::SubmissionNotFound(item.submission_id))?;

  record_grade(store, ctx, RecordGrade {
    student_id:    submission.student_id,
    assessment_id: submission.assessment_id,
    score:         item.score,
    feedback:      item.feedback,
  })
  .await
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// One student's overall standing in a class.
pub async fn aggregate_student<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  class_id: Uuid,
  student_id: Uuid,
) -> Result<StudentAggregate> {
  owned_class(store, ctx, class_id).await?;
  enrollment(store, class_id, student_id).await?;

  let entries = store
    .student_scores(class_id, student_id)
    .await
    .map_err(Error::store)?;
  Ok(StudentAggregate::from_entries(student_id, &entries))
}

/// Aggregate every active student in the class and summarise the roster.
pub async fn aggregate_class<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  class_id: Uuid,
) -> Result<ClassSummary> {
  owned_class(store, ctx, class_id).await?;

  let roster = store
    .list_roster(RosterQuery::active(class_id))
    .await
    .map_err(Error::store)?;
  let mut scores = group_by_student(
    store.class_scores(class_id).await.map_err(Error::store)?,
  );

  let rows = roster
    .into_iter()
    .map(|entry| {
      let entries = scores.remove(&entry.student.student_id).unwrap_or_default();
      StudentRow {
        aggregate: StudentAggregate::from_entries(
          entry.student.student_id,
          &entries,
        ),
        student:   entry.student,
      }
    })
    .collect();

  Ok(summarize_class(class_id, rows))
}
