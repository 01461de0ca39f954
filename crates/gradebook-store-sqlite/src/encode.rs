//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision, so they sort lexically. Enums are stored as lowercase snake
//! case. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use gradebook_core::{
  aggregate::{ClassScoreRow, ScoredEntry},
  assessment::{Assessment, AssessmentKind, Submission},
  class::{Class, Enrollment, EnrollmentStatus, RosterEntry, Student},
  grade::{GradeEntry, LetterGrade},
  question::{Question, QuestionKind},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_enrollment_status(s: EnrollmentStatus) -> &'static str {
  match s {
    EnrollmentStatus::Active => "active",
    EnrollmentStatus::Dropped => "dropped",
  }
}

pub fn decode_enrollment_status(s: &str) -> Result<EnrollmentStatus> {
  match s {
    "active" => Ok(EnrollmentStatus::Active),
    "dropped" => Ok(EnrollmentStatus::Dropped),
    other => Err(unknown("enrollments.status", other)),
  }
}

pub fn encode_assessment_kind(k: AssessmentKind) -> &'static str {
  match k {
    AssessmentKind::Assignment => "assignment",
    AssessmentKind::Quiz => "quiz",
  }
}

pub fn decode_assessment_kind(s: &str) -> Result<AssessmentKind> {
  match s {
    "assignment" => Ok(AssessmentKind::Assignment),
    "quiz" => Ok(AssessmentKind::Quiz),
    other => Err(unknown("assessments.kind", other)),
  }
}

pub fn encode_question_kind(k: QuestionKind) -> &'static str {
  match k {
    QuestionKind::MultipleChoice => "multiple_choice",
    QuestionKind::TrueFalse => "true_false",
    QuestionKind::ShortAnswer => "short_answer",
  }
}

pub fn decode_question_kind(s: &str) -> Result<QuestionKind> {
  match s {
    "multiple_choice" => Ok(QuestionKind::MultipleChoice),
    "true_false" => Ok(QuestionKind::TrueFalse),
    "short_answer" => Ok(QuestionKind::ShortAnswer),
    other => Err(unknown("questions.kind", other)),
  }
}

pub fn encode_letter(l: LetterGrade) -> String { l.to_string() }

pub fn decode_letter(s: &str) -> Result<LetterGrade> {
  s.parse().map_err(|_| unknown("grade_entries.letter", s))
}

fn unknown(column: &'static str, value: &str) -> Error {
  Error::UnknownVariant { column, value: value.to_owned() }
}

// ─── Question options ────────────────────────────────────────────────────────

pub fn encode_options(options: &[String]) -> Result<String> {
  Ok(serde_json::to_string(options)?)
}

pub fn decode_options(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` holds the untyped column values of one row. `from_row` runs on
// the database thread; `into_*` decodes on the caller's side.

pub const CLASS_COLUMNS: &str = "class_id, instructor_id, name, created_at";

pub struct RawClass {
  pub class_id:      String,
  pub instructor_id: String,
  pub name:          String,
  pub created_at:    String,
}

impl RawClass {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      class_id:      row.get(0)?,
      instructor_id: row.get(1)?,
      name:          row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_class(self) -> Result<Class> {
    Ok(Class {
      class_id:      decode_uuid(&self.class_id)?,
      instructor_id: decode_uuid(&self.instructor_id)?,
      name:          self.name,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const STUDENT_COLUMNS: &str = "student_id, name, email, created_at";

pub struct RawStudent {
  pub student_id: String,
  pub name:       String,
  pub email:      Option<String>,
  pub created_at: String,
}

impl RawStudent {
  /// Reads four student columns starting at `offset`.
  pub fn from_row_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id: row.get(offset)?,
      name:       row.get(offset + 1)?,
      email:      row.get(offset + 2)?,
      created_at: row.get(offset + 3)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      student_id: decode_uuid(&self.student_id)?,
      name:       self.name,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const ENROLLMENT_COLUMNS: &str = "class_id, student_id, status, enrolled_at";

pub struct RawEnrollment {
  pub class_id:    String,
  pub student_id:  String,
  pub status:      String,
  pub enrolled_at: String,
}

impl RawEnrollment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      class_id:    row.get(0)?,
      student_id:  row.get(1)?,
      status:      row.get(2)?,
      enrolled_at: row.get(3)?,
    })
  }

  pub fn into_enrollment(self) -> Result<Enrollment> {
    Ok(Enrollment {
      class_id:    decode_uuid(&self.class_id)?,
      student_id:  decode_uuid(&self.student_id)?,
      status:      decode_enrollment_status(&self.status)?,
      enrolled_at: decode_dt(&self.enrolled_at)?,
    })
  }
}

/// A student row joined with their enrollment status (columns 0-3 student,
/// 4 status, 5 enrolled_at).
pub struct RawRosterEntry {
  pub student:     RawStudent,
  pub status:      String,
  pub enrolled_at: String,
}

impl RawRosterEntry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student:     RawStudent::from_row_at(row, 0)?,
      status:      row.get(4)?,
      enrolled_at: row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<RosterEntry> {
    Ok(RosterEntry {
      student:     self.student.into_student()?,
      status:      decode_enrollment_status(&self.status)?,
      enrolled_at: decode_dt(&self.enrolled_at)?,
    })
  }
}

pub const ASSESSMENT_COLUMNS: &str =
  "assessment_id, class_id, kind, title, max_points, due_at, created_at";

pub struct RawAssessment {
  pub assessment_id: String,
  pub class_id:      String,
  pub kind:          String,
  pub title:         String,
  pub max_points:    f64,
  pub due_at:        Option<String>,
  pub created_at:    String,
}

impl RawAssessment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assessment_id: row.get(0)?,
      class_id:      row.get(1)?,
      kind:          row.get(2)?,
      title:         row.get(3)?,
      max_points:    row.get(4)?,
      due_at:        row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_assessment(self) -> Result<Assessment> {
    Ok(Assessment {
      assessment_id: decode_uuid(&self.assessment_id)?,
      class_id:      decode_uuid(&self.class_id)?,
      kind:          decode_assessment_kind(&self.kind)?,
      title:         self.title,
      max_points:    self.max_points,
      due_at:        decode_opt_dt(self.due_at)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const SUBMISSION_COLUMNS: &str = "submission_id, assessment_id, student_id, \
  submitted_at, notes, score, feedback, graded_at";

pub struct RawSubmission {
  pub submission_id: String,
  pub assessment_id: String,
  pub student_id:    String,
  pub submitted_at:  String,
  pub notes:         Option<String>,
  pub score:         Option<f64>,
  pub feedback:      Option<String>,
  pub graded_at:     Option<String>,
}

impl RawSubmission {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      submission_id: row.get(0)?,
      assessment_id: row.get(1)?,
      student_id:    row.get(2)?,
      submitted_at:  row.get(3)?,
      notes:         row.get(4)?,
      score:         row.get(5)?,
      feedback:      row.get(6)?,
      graded_at:     row.get(7)?,
    })
  }

  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      submission_id: decode_uuid(&self.submission_id)?,
      assessment_id: decode_uuid(&self.assessment_id)?,
      student_id:    decode_uuid(&self.student_id)?,
      submitted_at:  decode_dt(&self.submitted_at)?,
      notes:         self.notes,
      score:         self.score,
      feedback:      self.feedback,
      graded_at:     decode_opt_dt(self.graded_at)?,
    })
  }
}

pub const GRADE_COLUMNS: &str = "grade_id, student_id, assessment_id, score, \
  percentage, letter, feedback, updated_at";

pub struct RawGradeEntry {
  pub grade_id:      String,
  pub student_id:    String,
  pub assessment_id: String,
  pub score:         f64,
  pub percentage:    f64,
  pub letter:        String,
  pub feedback:      Option<String>,
  pub updated_at:    String,
}

impl RawGradeEntry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      grade_id:      row.get(0)?,
      student_id:    row.get(1)?,
      assessment_id: row.get(2)?,
      score:         row.get(3)?,
      percentage:    row.get(4)?,
      letter:        row.get(5)?,
      feedback:      row.get(6)?,
      updated_at:    row.get(7)?,
    })
  }

  pub fn into_entry(self) -> Result<GradeEntry> {
    Ok(GradeEntry {
      grade_id:      decode_uuid(&self.grade_id)?,
      student_id:    decode_uuid(&self.student_id)?,
      assessment_id: decode_uuid(&self.assessment_id)?,
      score:         self.score,
      percentage:    self.percentage,
      letter:        decode_letter(&self.letter)?,
      feedback:      self.feedback,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// `student_id, assessment_id, kind, score, max_points` from the grade /
/// assessment join.
pub struct RawScoreRow {
  pub student_id:    String,
  pub assessment_id: String,
  pub kind:          String,
  pub score:         f64,
  pub max_points:    f64,
}

impl RawScoreRow {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:    row.get(0)?,
      assessment_id: row.get(1)?,
      kind:          row.get(2)?,
      score:         row.get(3)?,
      max_points:    row.get(4)?,
    })
  }

  pub fn into_row(self) -> Result<ClassScoreRow> {
    Ok(ClassScoreRow {
      student_id: decode_uuid(&self.student_id)?,
      entry:      ScoredEntry {
        assessment_id: decode_uuid(&self.assessment_id)?,
        kind:          decode_assessment_kind(&self.kind)?,
        score:         self.score,
        max_points:    self.max_points,
      },
    })
  }
}

pub const QUESTION_COLUMNS: &str = "question_id, assessment_id, position, \
  prompt, kind, options_json, answer, points";

pub struct RawQuestion {
  pub question_id:   String,
  pub assessment_id: String,
  pub position:      u32,
  pub prompt:        String,
  pub kind:          String,
  pub options_json:  String,
  pub answer:        String,
  pub points:        f64,
}

impl RawQuestion {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      question_id:   row.get(0)?,
      assessment_id: row.get(1)?,
      position:      row.get(2)?,
      prompt:        row.get(3)?,
      kind:          row.get(4)?,
      options_json:  row.get(5)?,
      answer:        row.get(6)?,
      points:        row.get(7)?,
    })
  }

  pub fn into_question(self) -> Result<Question> {
    Ok(Question {
      question_id:   decode_uuid(&self.question_id)?,
      assessment_id: decode_uuid(&self.assessment_id)?,
      position:      self.position,
      prompt:        self.prompt,
      kind:          decode_question_kind(&self.kind)?,
      options:       decode_options(&self.options_json)?,
      answer:        self.answer,
      points:        self.points,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_have_fixed_width_and_roundtrip() {
    let whole = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
    let encoded = encode_dt(whole);
    assert_eq!(encoded, "2026-09-01T08:00:00.000000Z");
    assert_eq!(decode_dt(&encoded).unwrap(), whole);
  }

  #[test]
  fn letters_roundtrip_and_reject_garbage() {
    assert_eq!(encode_letter(LetterGrade::CPlus), "C+");
    assert_eq!(decode_letter("C+").unwrap(), LetterGrade::CPlus);
    assert!(matches!(
      decode_letter("E"),
      Err(Error::UnknownVariant { column: "grade_entries.letter", .. })
    ));
  }

  #[test]
  fn unknown_kind_is_reported_with_its_column() {
    let err = decode_assessment_kind("exam").unwrap_err();
    assert_eq!(err.to_string(), "unknown assessments.kind value: \"exam\"");
  }
}
