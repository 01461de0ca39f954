//! Error types for `gradebook-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad input: score out of range, empty required field, and so on. The
  /// message is shown to the instructor as-is.
  #[error("{0}")]
  Validation(String),

  /// The caller is not the instructor of record for the target class.
  #[error("{0}")]
  Authorization(String),

  #[error("class not found: {0}")]
  ClassNotFound(Uuid),

  #[error("student not found: {0}")]
  StudentNotFound(Uuid),

  #[error("assessment not found: {0}")]
  AssessmentNotFound(Uuid),

  #[error("submission not found: {0}")]
  SubmissionNotFound(Uuid),

  #[error("student {student_id} is not enrolled in class {class_id}")]
  EnrollmentNotFound { class_id: Uuid, student_id: Uuid },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::ClassNotFound(_)
        | Self::StudentNotFound(_)
        | Self::AssessmentNotFound(_)
        | Self::SubmissionNotFound(_)
        | Self::EnrollmentNotFound { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
