//! The `GradeStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `gradebook-store-sqlite`). The operations in [`crate::ops`] and the HTTP
//! layer depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  aggregate::{ClassScoreRow, ScoredEntry},
  assessment::{Assessment, AssessmentKind, NewAssessment, NewSubmission, Submission},
  class::{
    Class, Enrollment, EnrollmentStatus, NewClass, NewStudent, RosterEntry,
    RosterQuery, Student,
  },
  grade::GradeEntry,
  question::{NewQuestion, Question},
};

/// Abstraction over a gradebook storage backend.
///
/// Backends perform no authorization; callers go through [`crate::ops`].
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GradeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Classes ───────────────────────────────────────────────────────────

  fn add_class(
    &self,
    input: NewClass,
  ) -> impl Future<Output = Result<Class, Self::Error>> + Send + '_;

  fn get_class(
    &self,
    class_id: Uuid,
  ) -> impl Future<Output = Result<Option<Class>, Self::Error>> + Send + '_;

  /// Classes whose instructor of record is `instructor_id`, by name.
  fn list_classes(
    &self,
    instructor_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Class>, Self::Error>> + Send + '_;

  // ── Students and enrollments ──────────────────────────────────────────

  fn add_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Insert or update the enrollment for `(class_id, student_id)`. An
  /// existing enrollment keeps its original `enrolled_at`.
  fn upsert_enrollment(
    &self,
    class_id: Uuid,
    student_id: Uuid,
    status: EnrollmentStatus,
  ) -> impl Future<Output = Result<Enrollment, Self::Error>> + Send + '_;

  fn get_enrollment(
    &self,
    class_id: Uuid,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Option<Enrollment>, Self::Error>> + Send + '_;

  fn list_roster(
    &self,
    query: RosterQuery,
  ) -> impl Future<Output = Result<Vec<RosterEntry>, Self::Error>> + Send + '_;

  // ── Assessments and submissions ───────────────────────────────────────

  fn add_assessment(
    &self,
    input: NewAssessment,
  ) -> impl Future<Output = Result<Assessment, Self::Error>> + Send + '_;

  fn get_assessment(
    &self,
    assessment_id: Uuid,
  ) -> impl Future<Output = Result<Option<Assessment>, Self::Error>> + Send + '_;

  /// Ordered by due date (undated last), then title.
  fn list_assessments(
    &self,
    class_id: Uuid,
    kind: Option<AssessmentKind>,
  ) -> impl Future<Output = Result<Vec<Assessment>, Self::Error>> + Send + '_;

  fn add_submission(
    &self,
    input: NewSubmission,
  ) -> impl Future<Output = Result<Submission, Self::Error>> + Send + '_;

  fn get_submission(
    &self,
    submission_id: Uuid,
  ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send + '_;

  // ── Grades ────────────────────────────────────────────────────────────

  /// Atomically insert or overwrite the grade entry keyed by
  /// `(entry.student_id, entry.assessment_id)` and return the stored row.
  ///
  /// When `kind` is [`AssessmentKind::Assignment`] the legacy score mirror
  /// on the student's submissions for the assessment is updated in the same
  /// transaction. Either both writes land or neither does.
  fn upsert_grade(
    &self,
    entry: GradeEntry,
    kind: AssessmentKind,
  ) -> impl Future<Output = Result<GradeEntry, Self::Error>> + Send + '_;

  fn get_grade(
    &self,
    student_id: Uuid,
    assessment_id: Uuid,
  ) -> impl Future<Output = Result<Option<GradeEntry>, Self::Error>> + Send + '_;

  /// Every recorded grade of one student in one class, across both
  /// assessment kinds.
  fn student_scores(
    &self,
    class_id: Uuid,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ScoredEntry>, Self::Error>> + Send + '_;

  /// Every recorded grade in a class, tagged with its student.
  fn class_scores(
    &self,
    class_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ClassScoreRow>, Self::Error>> + Send + '_;

  // ── Quiz questions ────────────────────────────────────────────────────

  /// Append questions after the quiz's current last position, all in one
  /// transaction.
  fn add_questions(
    &self,
    assessment_id: Uuid,
    questions: Vec<NewQuestion>,
  ) -> impl Future<Output = Result<Vec<Question>, Self::Error>> + Send + '_;

  /// Questions in position order.
  fn list_questions(
    &self,
    assessment_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Question>, Self::Error>> + Send + '_;
}
