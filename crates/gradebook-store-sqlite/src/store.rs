//! [`SqliteStore`]: the SQLite implementation of [`GradeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use gradebook_core::{
  aggregate::{ClassScoreRow, ScoredEntry},
  assessment::{Assessment, AssessmentKind, NewAssessment, NewSubmission, Submission},
  class::{
    Class, Enrollment, EnrollmentStatus, NewClass, NewStudent, RosterEntry,
    RosterQuery, RosterSort, Student,
  },
  grade::GradeEntry,
  question::{NewQuestion, Question},
  store::GradeStore,
};

use crate::{
  Result,
  encode::{
    ASSESSMENT_COLUMNS, CLASS_COLUMNS, ENROLLMENT_COLUMNS, GRADE_COLUMNS,
    QUESTION_COLUMNS, RawAssessment, RawClass, RawEnrollment, RawGradeEntry,
    RawQuestion, RawRosterEntry, RawScoreRow, RawStudent, RawSubmission,
    STUDENT_COLUMNS, SUBMISSION_COLUMNS, decode_uuid, encode_assessment_kind,
    encode_dt, encode_enrollment_status, encode_letter, encode_options,
    encode_question_kind, encode_uuid,
  },
  schema::SCHEMA,
};

/// Fixed ORDER BY clause for each roster sort.
fn roster_order(sort: RosterSort) -> &'static str {
  match sort {
    RosterSort::NameAsc => "s.name ASC, s.student_id ASC",
    RosterSort::NameDesc => "s.name DESC, s.student_id ASC",
    RosterSort::EnrolledAsc => "e.enrolled_at ASC, s.name ASC",
    RosterSort::EnrolledDesc => "e.enrolled_at DESC, s.name ASC",
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gradebook backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Submissions for one (student, assessment); mostly useful for checking
  /// the legacy score mirror.
  pub async fn submissions_for(
    &self,
    student_id: Uuid,
    assessment_id: Uuid,
  ) -> Result<Vec<Submission>> {
    let student_str    = encode_uuid(student_id);
    let assessment_str = encode_uuid(assessment_id);

    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBMISSION_COLUMNS} FROM submissions
           WHERE student_id = ?1 AND assessment_id = ?2
           ORDER BY submitted_at"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![student_str, assessment_str],
            RawSubmission::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::into_submission).collect()
  }

  /// Number of grade entries for one (student, assessment). The UNIQUE
  /// constraint keeps this at 0 or 1.
  pub async fn grade_entry_count(
    &self,
    student_id: Uuid,
    assessment_id: Uuid,
  ) -> Result<u32> {
    let student_str    = encode_uuid(student_id);
    let assessment_str = encode_uuid(assessment_id);

    let count: u32 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM grade_entries
           WHERE student_id = ?1 AND assessment_id = ?2",
          rusqlite::params![student_str, assessment_str],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count)
  }
}

// ─── GradeStore impl ─────────────────────────────────────────────────────────

impl GradeStore for SqliteStore {
  type Error = crate::Error;

  // ── Classes ───────────────────────────────────────────────────────────────

  async fn add_class(&self, input: NewClass) -> Result<Class> {
    let class = Class {
      class_id:      Uuid::new_v4(),
      instructor_id: input.instructor_id,
      name:          input.name,
      created_at:    Utc::now(),
    };

    let id_str         = encode_uuid(class.class_id);
    let instructor_str = encode_uuid(class.instructor_id);
    let name           = class.name.clone();
    let at_str         = encode_dt(class.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO classes (class_id, instructor_id, name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, instructor_str, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(class)
  }

  async fn get_class(&self, class_id: Uuid) -> Result<Option<Class>> {
    let id_str = encode_uuid(class_id);

    let raw: Option<RawClass> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CLASS_COLUMNS} FROM classes WHERE class_id = ?1"),
              rusqlite::params![id_str],
              RawClass::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawClass::into_class).transpose()
  }

  async fn list_classes(&self, instructor_id: Uuid) -> Result<Vec<Class>> {
    let instructor_str = encode_uuid(instructor_id);

    let raws: Vec<RawClass> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CLASS_COLUMNS} FROM classes
           WHERE instructor_id = ?1
           ORDER BY name, class_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![instructor_str], RawClass::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClass::into_class).collect()
  }

  // ── Students and enrollments ──────────────────────────────────────────────

  async fn add_student(&self, input: NewStudent) -> Result<Student> {
    let student = Student {
      student_id: Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(student.student_id);
    let name   = student.name.clone();
    let email  = student.email.clone();
    let at_str = encode_dt(student.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (student_id, name, email, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, email, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(student)
  }

  async fn get_student(&self, student_id: Uuid) -> Result<Option<Student>> {
    let id_str = encode_uuid(student_id);

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"
              ),
              rusqlite::params![id_str],
              |row| RawStudent::from_row_at(row, 0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn upsert_enrollment(
    &self,
    class_id:   Uuid,
    student_id: Uuid,
    status:     EnrollmentStatus,
  ) -> Result<Enrollment> {
    let class_str   = encode_uuid(class_id);
    let student_str = encode_uuid(student_id);
    let status_str  = encode_enrollment_status(status);
    let at_str      = encode_dt(Utc::now());

    let raw: RawEnrollment = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO enrollments (class_id, student_id, status, enrolled_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (class_id, student_id) DO UPDATE SET
               status = excluded.status
             RETURNING {ENROLLMENT_COLUMNS}"
          ),
          rusqlite::params![class_str, student_str, status_str, at_str],
          RawEnrollment::from_row,
        )?)
      })
      .await?;

    raw.into_enrollment()
  }

  async fn get_enrollment(
    &self,
    class_id:   Uuid,
    student_id: Uuid,
  ) -> Result<Option<Enrollment>> {
    let class_str   = encode_uuid(class_id);
    let student_str = encode_uuid(student_id);

    let raw: Option<RawEnrollment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
                 WHERE class_id = ?1 AND student_id = ?2"
              ),
              rusqlite::params![class_str, student_str],
              RawEnrollment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEnrollment::into_enrollment).transpose()
  }

  async fn list_roster(&self, query: RosterQuery) -> Result<Vec<RosterEntry>> {
    let class_str  = encode_uuid(query.class_id);
    let status_str = query.status.map(encode_enrollment_status);
    let order      = roster_order(query.sort);

    let raws: Vec<RawRosterEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT s.student_id, s.name, s.email, s.created_at,
                  e.status, e.enrolled_at
           FROM enrollments e
           JOIN students s ON s.student_id = e.student_id
           WHERE e.class_id = ?1
             AND (?2 IS NULL OR e.status = ?2)
           ORDER BY {order}"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![class_str, status_str],
            RawRosterEntry::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRosterEntry::into_entry).collect()
  }

  // ── Assessments and submissions ───────────────────────────────────────────

  async fn add_assessment(&self, input: NewAssessment) -> Result<Assessment> {
    let assessment = Assessment {
      assessment_id: Uuid::new_v4(),
      class_id:      input.class_id,
      kind:          input.kind,
      title:         input.title,
      max_points:    input.max_points,
      due_at:        input.due_at,
      created_at:    Utc::now(),
    };

    let id_str     = encode_uuid(assessment.assessment_id);
    let class_str  = encode_uuid(assessment.class_id);
    let kind_str   = encode_assessment_kind(assessment.kind);
    let title      = assessment.title.clone();
    let max_points = assessment.max_points;
    let due_str    = assessment.due_at.map(encode_dt);
    let at_str     = encode_dt(assessment.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assessments (
             assessment_id, class_id, kind, title, max_points, due_at, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, class_str, kind_str, title, max_points, due_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(assessment)
  }

  async fn get_assessment(&self, assessment_id: Uuid) -> Result<Option<Assessment>> {
    let id_str = encode_uuid(assessment_id);

    let raw: Option<RawAssessment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ASSESSMENT_COLUMNS} FROM assessments
                 WHERE assessment_id = ?1"
              ),
              rusqlite::params![id_str],
              RawAssessment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAssessment::into_assessment).transpose()
  }

  async fn list_assessments(
    &self,
    class_id: Uuid,
    kind:     Option<AssessmentKind>,
  ) -> Result<Vec<Assessment>> {
    let class_str = encode_uuid(class_id);
    let kind_str  = kind.map(encode_assessment_kind);

    let raws: Vec<RawAssessment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSESSMENT_COLUMNS} FROM assessments
           WHERE class_id = ?1
             AND (?2 IS NULL OR kind = ?2)
           ORDER BY due_at IS NULL, due_at, title, assessment_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![class_str, kind_str], RawAssessment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssessment::into_assessment).collect()
  }

  async fn add_submission(&self, input: NewSubmission) -> Result<Submission> {
    let submission = Submission {
      submission_id: Uuid::new_v4(),
      assessment_id: input.assessment_id,
      student_id:    input.student_id,
      submitted_at:  Utc::now(),
      notes:         input.notes,
      score:         None,
      feedback:      None,
      graded_at:     None,
    };

    let id_str         = encode_uuid(submission.submission_id);
    let assessment_str = encode_uuid(submission.assessment_id);
    let student_str    = encode_uuid(submission.student_id);
    let at_str         = encode_dt(submission.submitted_at);
    let notes          = submission.notes.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO submissions (
             submission_id, assessment_id, student_id, submitted_at, notes
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, assessment_str, student_str, at_str, notes],
        )?;
        Ok(())
      })
      .await?;

    Ok(submission)
  }

  async fn get_submission(&self, submission_id: Uuid) -> Result<Option<Submission>> {
    let id_str = encode_uuid(submission_id);

    let raw: Option<RawSubmission> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUBMISSION_COLUMNS} FROM submissions
                 WHERE submission_id = ?1"
              ),
              rusqlite::params![id_str],
              RawSubmission::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubmission::into_submission).transpose()
  }

  // ── Grades ────────────────────────────────────────────────────────────────

  async fn upsert_grade(
    &self,
    entry: GradeEntry,
    kind:  AssessmentKind,
  ) -> Result<GradeEntry> {
    let grade_id_str   = encode_uuid(entry.grade_id);
    let student_str    = encode_uuid(entry.student_id);
    let assessment_str = encode_uuid(entry.assessment_id);
    let score          = entry.score;
    let percentage     = entry.percentage;
    let letter_str     = encode_letter(entry.letter);
    let feedback       = entry.feedback.clone();
    let at_str         = encode_dt(entry.updated_at);
    let mirror         = kind == AssessmentKind::Assignment;

    let stored_id: String = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if mirror {
          tx.execute(
            "UPDATE submissions
             SET score = ?1, feedback = ?2, graded_at = ?3
             WHERE assessment_id = ?4 AND student_id = ?5",
            rusqlite::params![score, feedback, at_str, assessment_str, student_str],
          )?;
        }

        // The conflict target keeps the first grade_id; RETURNING hands back
        // whichever id is now on the row.
        let stored_id: String = tx.query_row(
          "INSERT INTO grade_entries (
             grade_id, student_id, assessment_id, score, percentage,
             letter, feedback, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT (student_id, assessment_id) DO UPDATE SET
             score      = excluded.score,
             percentage = excluded.percentage,
             letter     = excluded.letter,
             feedback   = excluded.feedback,
             updated_at = excluded.updated_at
           RETURNING grade_id",
          rusqlite::params![
            grade_id_str,
            student_str,
            assessment_str,
            score,
            percentage,
            letter_str,
            feedback,
            at_str,
          ],
          |r| r.get(0),
        )?;

        tx.commit()?;
        Ok(stored_id)
      })
      .await?;

    Ok(GradeEntry { grade_id: decode_uuid(&stored_id)?, ..entry })
  }

  async fn get_grade(
    &self,
    student_id:    Uuid,
    assessment_id: Uuid,
  ) -> Result<Option<GradeEntry>> {
    let student_str    = encode_uuid(student_id);
    let assessment_str = encode_uuid(assessment_id);

    let raw: Option<RawGradeEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {GRADE_COLUMNS} FROM grade_entries
                 WHERE student_id = ?1 AND assessment_id = ?2"
              ),
              rusqlite::params![student_str, assessment_str],
              RawGradeEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGradeEntry::into_entry).transpose()
  }

  async fn student_scores(
    &self,
    class_id:   Uuid,
    student_id: Uuid,
  ) -> Result<Vec<ScoredEntry>> {
    let class_str   = encode_uuid(class_id);
    let student_str = encode_uuid(student_id);

    let raws: Vec<RawScoreRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT g.student_id, g.assessment_id, a.kind, g.score, a.max_points
           FROM grade_entries g
           JOIN assessments a ON a.assessment_id = g.assessment_id
           WHERE a.class_id = ?1 AND g.student_id = ?2
           ORDER BY a.kind, a.title, a.assessment_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![class_str, student_str], RawScoreRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| raw.into_row().map(|row| row.entry))
      .collect()
  }

  async fn class_scores(&self, class_id: Uuid) -> Result<Vec<ClassScoreRow>> {
    let class_str = encode_uuid(class_id);

    let raws: Vec<RawScoreRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT g.student_id, g.assessment_id, a.kind, g.score, a.max_points
           FROM grade_entries g
           JOIN assessments a ON a.assessment_id = g.assessment_id
           WHERE a.class_id = ?1
           ORDER BY g.student_id, a.kind, a.title, a.assessment_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![class_str], RawScoreRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScoreRow::into_row).collect()
  }

  // ── Quiz questions ────────────────────────────────────────────────────────

  async fn add_questions(
    &self,
    assessment_id: Uuid,
    questions:     Vec<NewQuestion>,
  ) -> Result<Vec<Question>> {
    let assessment_str = encode_uuid(assessment_id);

    // Encode everything up front so the closure only binds parameters.
    let ids: Vec<Uuid> = questions.iter().map(|_| Uuid::new_v4()).collect();
    let rows = ids
      .iter()
      .zip(&questions)
      .map(|(id, q)| -> Result<_> {
        Ok((
          encode_uuid(*id),
          q.prompt.clone(),
          encode_question_kind(q.kind),
          encode_options(&q.options)?,
          q.answer.clone(),
          q.points,
        ))
      })
      .collect::<Result<Vec<_>>>()?;

    let first_position: u32 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let last: u32 = tx.query_row(
          "SELECT COALESCE(MAX(position), 0) FROM questions WHERE assessment_id = ?1",
          rusqlite::params![assessment_str],
          |r| r.get(0),
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO questions (
               question_id, assessment_id, position, prompt, kind,
               options_json, answer, points
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for (offset, (id, prompt, kind, options, answer, points)) in
            rows.iter().enumerate()
          {
            stmt.execute(rusqlite::params![
              id,
              assessment_str,
              last + 1 + offset as u32,
              prompt,
              kind,
              options,
              answer,
              points,
            ])?;
          }
        }

        tx.commit()?;
        Ok(last + 1)
      })
      .await?;

    Ok(
      ids
        .into_iter()
        .zip(questions)
        .enumerate()
        .map(|(offset, (question_id, q))| Question {
          question_id,
          assessment_id,
          position: first_position + offset as u32,
          prompt: q.prompt,
          kind: q.kind,
          options: q.options,
          answer: q.answer,
          points: q.points,
        })
        .collect(),
    )
  }

  async fn list_questions(&self, assessment_id: Uuid) -> Result<Vec<Question>> {
    let assessment_str = encode_uuid(assessment_id);

    let raws: Vec<RawQuestion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUESTION_COLUMNS} FROM questions
           WHERE assessment_id = ?1
           ORDER BY position"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![assessment_str], RawQuestion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuestion::into_question).collect()
  }
}
