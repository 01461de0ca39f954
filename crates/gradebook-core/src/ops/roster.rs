//! Class, roster, assessment and submission management.

use tracing::info;
use uuid::Uuid;

use crate::{
  Error, InstructorContext, Result,
  assessment::{Assessment, AssessmentKind, NewAssessment, NewSubmission, Submission},
  class::{
    Class, Enrollment, EnrollmentStatus, NewClass, NewStudent, RosterEntry,
    RosterQuery, Student,
  },
  store::GradeStore,
};

use super::authz::{enrollment, owned_assessment, owned_class};

// ─── Classes ─────────────────────────────────────────────────────────────────

/// Create a class with the caller as instructor of record.
pub async fn create_class<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  name: &str,
) -> Result<Class> {
  let name = name.trim();
  if name.is_empty() {
    return Err(Error::validation("Class name is required"));
  }
  let class = store
    .add_class(NewClass {
      instructor_id: ctx.instructor_id,
      name:          name.to_owned(),
    })
    .await
    .map_err(Error::store)?;
  info!(class_id = %class.class_id, instructor_id = %ctx.instructor_id, "class created");
  Ok(class)
}

pub async fn list_classes<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
) -> Result<Vec<Class>> {
  store
    .list_classes(ctx.instructor_id)
    .await
    .map_err(Error::store)
}

// ─── Students and roster ─────────────────────────────────────────────────────

pub async fn add_student<S: GradeStore>(
  store: &S,
  input: NewStudent,
) -> Result<Student> {
  let name = input.name.trim().to_owned();
  if name.is_empty() {
    return Err(Error::validation("Student name is required"));
  }
  let email = input
    .email
    .map(|e| e.trim().to_owned())
    .filter(|e| !e.is_empty());
  store
    .add_student(NewStudent { name, email })
    .await
    .map_err(Error::store)
}

/// Enroll a student, reactivating a dropped enrollment if there is one.
pub async fn enroll<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  class_id: Uuid,
  student_id: Uuid,
) -> Result<Enrollment> {
  owned_class(store, ctx, class_id).await?;
  store
    .get_student(student_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::StudentNotFound(student_id))?;

  let enrollment = store
    .upsert_enrollment(class_id, student_id, EnrollmentStatus::Active)
    .await
    .map_err(Error::store)?;
  info!(%class_id, %student_id, "student enrolled");
  Ok(enrollment)
}

/// Change the status of an existing enrollment.
pub async fn set_enrollment_status<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  class_id: Uuid,
  student_id: Uuid,
  status: EnrollmentStatus,
) -> Result<Enrollment> {
  owned_class(store, ctx, class_id).await?;
  enrollment(store, class_id, student_id).await?;
  store
    .upsert_enrollment(class_id, student_id, status)
    .await
    .map_err(Error::store)
}

pub async fn list_roster<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  query: RosterQuery,
) -> Result<Vec<RosterEntry>> {
  owned_class(store, ctx, query.class_id).await?;
  store.list_roster(query).await.map_err(Error::store)
}

// ─── Assessments ─────────────────────────────────────────────────────────────

pub async fn create_assessment<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  input: NewAssessment,
) -> Result<Assessment> {
  owned_class(store, ctx, input.class_id).await?;
  input.validate()?;
  let input = NewAssessment { title: input.title.trim().to_owned(), ..input };
  let assessment = store.add_assessment(input).await.map_err(Error::store)?;
  info!(
    assessment_id = %assessment.assessment_id,
    class_id = %assessment.class_id,
    kind = ?assessment.kind,
    "assessment created"
  );
  Ok(assessment)
}

pub async fn list_assessments<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  class_id: Uuid,
  kind: Option<AssessmentKind>,
) -> Result<Vec<Assessment>> {
  owned_class(store, ctx, class_id).await?;
  store
    .list_assessments(class_id, kind)
    .await
    .map_err(Error::store)
}

/// Record a hand-in for an enrolled student.
pub async fn record_submission<S: GradeStore>(
  store: &S,
  ctx: &InstructorContext,
  input: NewSubmission,
) -> Result<Submission> {
  let assessment = owned_assessment(store, ctx, input.assessment_id).await?;
  enrollment(store, assessment.class_id, input.student_id).await?;
  store.add_submission(input).await.map_err(Error::store)
}
