//! Importing a parsed bank into a quiz.

use gradebook_core::{InstructorContext, ops, store::GradeStore};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{ImportFormat, Result};

/// Outcome of a bulk import. `errors` holds one `Row <n>: <reason>` line
/// per rejected question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
  pub imported: usize,
  pub failed:   usize,
  pub errors:   Vec<String>,
}

/// Parse `body` and append its valid questions to the quiz.
///
/// Valid questions land after the quiz's existing ones in a single
/// transaction; rejected ones are only reported.
pub async fn import_questions<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  assessment_id: Uuid,
  format: ImportFormat,
  body: &str,
) -> Result<ImportSummary> {
  let bank = crate::parse(format, body)?;
  let stored =
    ops::add_questions(store, ctx, assessment_id, bank.questions).await?;

  let summary = ImportSummary {
    imported: stored.len(),
    failed:   bank.errors.len(),
    errors:   bank.errors.iter().map(ToString::to_string).collect(),
  };
  info!(
    %assessment_id,
    %format,
    imported = summary.imported,
    failed = summary.failed,
    "question bank imported"
  );
  Ok(summary)
}

#[cfg(test)]
mod tests {
  use gradebook_core::{
    Error as CoreError,
    assessment::{AssessmentKind, NewAssessment},
  };
  use gradebook_store_sqlite::SqliteStore;

  use super::*;
  use crate::Error;

  async fn quiz(kind: AssessmentKind) -> (SqliteStore, InstructorContext, Uuid) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let ctx = InstructorContext::new(Uuid::new_v4());
    let class = ops::create_class(&store, &ctx, "History").await.unwrap();
    let quiz = ops::create_assessment(&store, &ctx, NewAssessment {
      class_id: class.class_id,
      kind,
      title: "Unit 1".into(),
      max_points: 10.0,
      due_at: None,
    })
    .await
    .unwrap();
    (store, ctx, quiz.assessment_id)
  }

  const BANK: &str = "\
question,type,points,option_a,option_b,option_c,option_d,answer
Capital of France?,mc,2,Berlin,Paris,,,b
,tf,1,,,,,true
The sky is blue,tf,,,,,,maybe
Name the author of Hamlet,short,3,,,,,Shakespeare
";

  #[tokio::test]
  async fn good_rows_import_and_bad_rows_are_reported() {
    let (store, ctx, quiz) = quiz(AssessmentKind::Quiz).await;

    let summary =
      import_questions(&store, &ctx, quiz, ImportFormat::Csv, BANK)
        .await
        .unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.errors[0], "Row 2: Question text is required");
    assert!(summary.errors[1].starts_with("Row 3: "));

    let stored = ops::list_questions(&store, &ctx, quiz).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].answer, "Paris");
    assert_eq!(stored[1].position, 2);
  }

  #[tokio::test]
  async fn imports_append_after_existing_questions() {
    let (store, ctx, quiz) = quiz(AssessmentKind::Quiz).await;
    import_questions(&store, &ctx, quiz, ImportFormat::Csv, BANK)
      .await
      .unwrap();

    let json = r#"[{"question": "2 + 2?", "type": "short", "answer": 4}]"#;
    let summary =
      import_questions(&store, &ctx, quiz, ImportFormat::Json, json)
        .await
        .unwrap();
    assert_eq!(summary.imported, 1);

    let stored = ops::list_questions(&store, &ctx, quiz).await.unwrap();
    assert_eq!(stored[2].position, 3);
    assert_eq!(stored[2].answer, "4");
  }

  #[tokio::test]
  async fn malformed_document_imports_nothing() {
    let (store, ctx, quiz) = quiz(AssessmentKind::Quiz).await;
    let err = import_questions(&store, &ctx, quiz, ImportFormat::Json, "[{")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    assert!(
      ops::list_questions(&store, &ctx, quiz)
        .await
        .unwrap()
        .is_empty()
    );
  }

  #[tokio::test]
  async fn assignments_do_not_take_questions() {
    let (store, ctx, essay) = quiz(AssessmentKind::Assignment).await;
    let err = import_questions(&store, &ctx, essay, ImportFormat::Csv, BANK)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::Validation(_))));
  }

  #[tokio::test]
  async fn other_instructors_cannot_import() {
    let (store, _, quiz) = quiz(AssessmentKind::Quiz).await;
    let stranger = InstructorContext::new(Uuid::new_v4());
    let err = import_questions(&store, &stranger, quiz, ImportFormat::Csv, BANK)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::Authorization(_))));
  }
}
