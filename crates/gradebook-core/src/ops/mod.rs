//! Instructor operations, generic over any [`GradeStore`].
//!
//! Every operation takes the caller's [`InstructorContext`] and checks
//! ownership of the target class before touching data.
//!
//! [`GradeStore`]: crate::store::GradeStore
//! [`InstructorContext`]: crate::InstructorContext

mod authz;
pub mod grading;
pub mod questions;
pub mod roster;

pub use authz::{owned_assessment, owned_class};
pub use grading::{
  BulkGradeItem, BulkResult, RecordGrade, aggregate_class, aggregate_student,
  bulk_grade, record_grade,
};
pub use questions::{add_question, add_questions, list_questions};
pub use roster::{
  add_student, create_assessment, create_class, enroll, list_assessments,
  list_classes, list_roster, record_submission, set_enrollment_status,
};
