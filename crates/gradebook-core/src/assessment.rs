//! Assessments (assignments and quizzes) and the submissions made against
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The two kinds of gradable work. Both feed the same aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
  Assignment,
  Quiz,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
  pub assessment_id: Uuid,
  pub class_id:      Uuid,
  pub kind:          AssessmentKind,
  pub title:         String,
  /// Always finite and strictly positive.
  pub max_points:    f64,
  /// Due date for assignments, availability date for quizzes.
  pub due_at:        Option<DateTime<Utc>>,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::GradeStore::add_assessment`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewAssessment {
  pub class_id:   Uuid,
  pub kind:       AssessmentKind,
  pub title:      String,
  pub max_points: f64,
  #[serde(default)]
  pub due_at:     Option<DateTime<Utc>>,
}

impl NewAssessment {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::validation("Assessment title is required"));
    }
    if !self.max_points.is_finite() || self.max_points <= 0.0 {
      return Err(Error::validation(
        "Maximum points must be a positive number",
      ));
    }
    Ok(())
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// A student's hand-in. `score`, `feedback` and `graded_at` are the legacy
/// mirror of the grade entry; for assignments the store keeps them in step
/// with the entry on every upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
  pub submission_id: Uuid,
  pub assessment_id: Uuid,
  pub student_id:    Uuid,
  pub submitted_at:  DateTime<Utc>,
  pub notes:         Option<String>,
  pub score:         Option<f64>,
  pub feedback:      Option<String>,
  pub graded_at:     Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubmission {
  pub assessment_id: Uuid,
  pub student_id:    Uuid,
  #[serde(default)]
  pub notes:         Option<String>,
}
