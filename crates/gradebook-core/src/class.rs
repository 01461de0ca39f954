//! Classes, students and the enrollments that connect them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Class ───────────────────────────────────────────────────────────────────

/// A class taught by exactly one instructor of record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
  pub class_id:      Uuid,
  pub instructor_id: Uuid,
  pub name:          String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::GradeStore::add_class`].
#[derive(Debug, Clone)]
pub struct NewClass {
  pub instructor_id: Uuid,
  pub name:          String,
}

// ─── Student ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub student_id: Uuid,
  pub name:       String,
  pub email:      Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
  pub name:  String,
  #[serde(default)]
  pub email: Option<String>,
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
  #[default]
  Active,
  Dropped,
}

/// A student's membership in a class. At most one per (class, student).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
  pub class_id:    Uuid,
  pub student_id:  Uuid,
  pub status:      EnrollmentStatus,
  pub enrolled_at: DateTime<Utc>,
}

// ─── Roster query ────────────────────────────────────────────────────────────

/// The closed set of roster orderings. Backends map each variant to a fixed
/// ORDER BY clause; caller text never reaches the SQL.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RosterSort {
  #[default]
  NameAsc,
  NameDesc,
  EnrolledAsc,
  EnrolledDesc,
}

/// Parameters for [`crate::store::GradeStore::list_roster`].
#[derive(Debug, Clone)]
pub struct RosterQuery {
  pub class_id: Uuid,
  /// Restrict to one enrollment status; `None` lists everybody.
  pub status:   Option<EnrollmentStatus>,
  pub sort:     RosterSort,
}

impl RosterQuery {
  /// Active students ordered by name: the set the gradebook aggregates.
  pub fn active(class_id: Uuid) -> Self {
    Self {
      class_id,
      status: Some(EnrollmentStatus::Active),
      sort: RosterSort::NameAsc,
    }
  }
}

/// One roster line: the student plus their enrollment in the class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
  pub student:     Student,
  pub status:      EnrollmentStatus,
  pub enrolled_at: DateTime<Utc>,
}
