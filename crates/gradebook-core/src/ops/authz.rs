//! Ownership checks shared by every operation.

use uuid::Uuid;

use crate::{
  Error, InstructorContext, Result,
  assessment::Assessment,
  class::{Class, Enrollment},
  store::GradeStore,
};

/// Load a class and check the caller is its instructor of record.
pub async fn owned_class<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  class_id: Uuid,
) -> Result<Class> {
  let class = store
    .get_class(class_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ClassNotFound(class_id))?;

  if class.instructor_id != ctx.instructor_id {
    tracing::warn!(
      instructor_id = %ctx.instructor_id,
      %class_id,
      "rejected access to class owned by another instructor"
    );
    return Err(Error::Authorization(format!(
      "You are not the instructor of class {class_id}"
    )));
  }
  Ok(class)
}

/// Load an assessment and check the caller owns its class.
pub async fn owned_assessment<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  assessment_id: Uuid,
) -> Result<Assessment> {
  let assessment = store
    .get_assessment(assessment_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AssessmentNotFound(assessment_id))?;
  owned_class(store, ctx, assessment.class_id).await?;
  Ok(assessment)
}

/// The student's enrollment in the class, in any status.
pub(crate) async fn enrollment<S: GradeStore>(
  store: &S,
  class_id: Uuid,
  student_id: Uuid,
) -> Result<Enrollment> {
  store
    .get_enrollment(class_id, student_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::EnrollmentNotFound { class_id, student_id })
}
