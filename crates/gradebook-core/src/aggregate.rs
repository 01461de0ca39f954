//! The grade aggregator: pure functions from scored entries to per-student
//! aggregates and class summaries.
//!
//! Aggregates are read models. They are recomputed from the grade entries on
//! every request and never stored.

use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  assessment::AssessmentKind,
  class::Student,
  grade::{
    GradeBand, LetterGrade, compute_letter_grade, percentage,
    serialize_percentage, serialize_percentage_opt,
  },
};

/// Students below this overall percentage may need attention...
pub const ATTENTION_BELOW_PERCENT: f64 = 50.0;
/// ...but only once they have more than this many graded entries.
pub const ATTENTION_MIN_ENTRIES: usize = 2;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// One recorded grade in the uniform shape shared by assignments and
/// quizzes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
  pub assessment_id: Uuid,
  pub kind:          AssessmentKind,
  pub score:         f64,
  pub max_points:    f64,
}

/// A [`ScoredEntry`] tagged with the student it belongs to, as returned by a
/// class-wide read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScoreRow {
  pub student_id: Uuid,
  pub entry:      ScoredEntry,
}

/// Group class-wide rows by student.
pub fn group_by_student(
  rows: impl IntoIterator<Item = ClassScoreRow>,
) -> HashMap<Uuid, Vec<ScoredEntry>> {
  let mut grouped: HashMap<Uuid, Vec<ScoredEntry>> = HashMap::new();
  for row in rows {
    grouped.entry(row.student_id).or_default().push(row.entry);
  }
  grouped
}

// ─── Student aggregate ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAggregate {
  pub student_id:   Uuid,
  pub total_score:  f64,
  pub total_max:    f64,
  pub graded_count: usize,
  /// Exact in memory; serialized rounded to two decimals.
  #[serde(serialize_with = "serialize_percentage")]
  pub percentage:   f64,
  pub letter:       LetterGrade,
}

impl StudentAggregate {
  /// Sum the recorded entries. Assessments without an entry contribute
  /// nothing to either total.
  ///
  /// With no entries at all the result is 0% and an `F`, the same as a
  /// student who scored zero everywhere; use [`Self::is_ungraded`] to tell
  /// the two apart.
  pub fn from_entries(student_id: Uuid, entries: &[ScoredEntry]) -> Self {
    let total_score: f64 = entries.iter().map(|e| e.score).sum();
    let total_max: f64 = entries.iter().map(|e| e.max_points).sum();
    let percentage = percentage(total_score, total_max);
    Self {
      student_id,
      total_score,
      total_max,
      graded_count: entries.len(),
      percentage,
      letter: compute_letter_grade(percentage),
    }
  }

  pub fn is_ungraded(&self) -> bool { self.graded_count == 0 }

  pub fn needs_attention(&self) -> bool {
    self.percentage < ATTENTION_BELOW_PERCENT
      && self.graded_count > ATTENTION_MIN_ENTRIES
  }
}

// ─── Class summary ───────────────────────────────────────────────────────────

/// Count of students per coarse letter band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeHistogram {
  pub a: usize,
  pub b: usize,
  pub c: usize,
  pub d: usize,
  pub f: usize,
}

impl GradeHistogram {
  pub fn add(&mut self, letter: LetterGrade) {
    match letter.band() {
      GradeBand::A => self.a += 1,
      GradeBand::B => self.b += 1,
      GradeBand::C => self.c += 1,
      GradeBand::D => self.d += 1,
      GradeBand::F => self.f += 1,
    }
  }

  pub fn total(&self) -> usize { self.a + self.b + self.c + self.d + self.f }
}

/// One student's line in the class summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRow {
  pub student:   Student,
  pub aggregate: StudentAggregate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSummary {
  pub class_id:        Uuid,
  /// Ordered best first: percentage desc, then name, then id.
  pub students:        Vec<StudentRow>,
  /// Every student in `students`, ungraded ones counted under F.
  pub histogram:       GradeHistogram,
  /// Highest percentage among students with graded work.
  pub top_performer:   Option<Uuid>,
  pub needs_attention: Vec<Uuid>,
  /// Students with no graded entries at all.
  pub ungraded:        Vec<Uuid>,
  /// Mean percentage over students with graded work.
  #[serde(serialize_with = "serialize_percentage_opt")]
  pub class_average:   Option<f64>,
}

/// Percentage desc, name asc, id asc. Total, so the result does not depend on
/// input order.
fn rank(a: &StudentRow, b: &StudentRow) -> Ordering {
  b.aggregate
    .percentage
    .total_cmp(&a.aggregate.percentage)
    .then_with(|| a.student.name.cmp(&b.student.name))
    .then_with(|| a.student.student_id.cmp(&b.student.student_id))
}

/// Build the class summary from per-student rows.
pub fn summarize_class(class_id: Uuid, mut rows: Vec<StudentRow>) -> ClassSummary {
  rows.sort_by(rank);

  let mut histogram = GradeHistogram::default();
  let mut needs_attention = Vec::new();
  let mut ungraded = Vec::new();
  let mut graded_sum = 0.0;
  let mut graded_students = 0usize;

  for row in &rows {
    let agg = &row.aggregate;
    histogram.add(agg.letter);
    if agg.needs_attention() {
      needs_attention.push(agg.student_id);
    }
    if agg.is_ungraded() {
      ungraded.push(agg.student_id);
    } else {
      graded_sum += agg.percentage;
      graded_students += 1;
    }
  }

  let top_performer = rows
    .iter()
    .find(|r| !r.aggregate.is_ungraded())
    .map(|r| r.student.student_id);

  let class_average =
    (graded_students > 0).then(|| graded_sum / graded_students as f64);

  ClassSummary {
    class_id,
    students: rows,
    histogram,
    top_performer,
    needs_attention,
    ungraded,
    class_average,
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn entry(kind: AssessmentKind, score: f64, max_points: f64) -> ScoredEntry {
    ScoredEntry { assessment_id: Uuid::new_v4(), kind, score, max_points }
  }

  fn row(name: &str, entries: &[ScoredEntry]) -> StudentRow {
    let student = Student {
      student_id: Uuid::new_v4(),
      name:       name.into(),
      email:      None,
      created_at: Utc::now(),
    };
    let aggregate = StudentAggregate::from_entries(student.student_id, entries);
    StudentRow { student, aggregate }
  }

  /// `n` entries scoring `pct` percent out of 10 points each.
  fn flat(n: usize, pct: f64) -> Vec<ScoredEntry> {
    (0..n)
      .map(|_| entry(AssessmentKind::Assignment, pct / 10.0, 10.0))
      .collect()
  }

  #[test]
  fn mixes_assignments_and_quizzes() {
    let agg = StudentAggregate::from_entries(
      Uuid::nil(),
      &[
        entry(AssessmentKind::Assignment, 80.0, 100.0),
        entry(AssessmentKind::Quiz, 18.0, 20.0),
      ],
    );
    assert_eq!(agg.total_score, 98.0);
    assert_eq!(agg.total_max, 120.0);
    assert!((agg.percentage - 81.67).abs() < 0.005, "{}", agg.percentage);
    assert_eq!(agg.letter, LetterGrade::B);
    assert_eq!(agg.graded_count, 2);

    let json = serde_json::to_value(&agg).unwrap();
    assert_eq!(json["percentage"], 81.67);
  }

  #[test]
  fn no_entries_is_zero_percent_f_but_flagged_ungraded() {
    let agg = StudentAggregate::from_entries(Uuid::nil(), &[]);
    assert_eq!(agg.percentage, 0.0);
    assert_eq!(agg.letter, LetterGrade::F);
    assert!(agg.is_ungraded());

    let zeroes = StudentAggregate::from_entries(Uuid::nil(), &flat(1, 0.0));
    assert_eq!(zeroes.letter, LetterGrade::F);
    assert!(!zeroes.is_ungraded());
  }

  #[test]
  fn needs_attention_requires_more_than_two_entries() {
    let one = StudentAggregate::from_entries(Uuid::nil(), &flat(1, 40.0));
    let two = StudentAggregate::from_entries(Uuid::nil(), &flat(2, 40.0));
    let three = StudentAggregate::from_entries(Uuid::nil(), &flat(3, 40.0));
    assert!(!one.needs_attention());
    assert!(!two.needs_attention());
    assert!(three.needs_attention());

    let passing = StudentAggregate::from_entries(Uuid::nil(), &flat(3, 50.0));
    assert!(!passing.needs_attention());
  }

  #[test]
  fn histogram_groups_letters_into_bands() {
    let summary = summarize_class(Uuid::nil(), vec![
      row("a+", &flat(1, 98.0)),
      row("a-", &flat(1, 91.0)),
      row("b", &flat(1, 85.0)),
      row("c-", &flat(1, 71.0)),
      row("d+", &flat(1, 68.0)),
      row("f", &flat(1, 10.0)),
      row("none", &[]),
    ]);
    assert_eq!(summary.histogram, GradeHistogram { a: 2, b: 1, c: 1, d: 1, f: 2 });
    assert_eq!(summary.histogram.total(), 7);
  }

  #[test]
  fn summary_lists_attention_and_ungraded_students() {
    let struggling = row("Struggling", &flat(3, 40.0));
    let new = row("New", &flat(1, 40.0));
    let absent = row("Absent", &[]);
    let ids = (
      struggling.student.student_id,
      new.student.student_id,
      absent.student.student_id,
    );

    let summary = summarize_class(Uuid::nil(), vec![struggling, new, absent]);
    assert_eq!(summary.needs_attention, vec![ids.0]);
    assert_eq!(summary.ungraded, vec![ids.2]);
    assert_eq!(summary.class_average, Some(40.0));
    assert!(!summary.needs_attention.contains(&ids.1));
  }

  #[test]
  fn top_performer_ties_break_by_name_regardless_of_order() {
    let zed = row("Zed", &flat(2, 95.0));
    let amy = row("Amy", &flat(2, 95.0));
    let low = row("Bob", &flat(2, 70.0));
    let amy_id = amy.student.student_id;

    let forward = summarize_class(Uuid::nil(), vec![zed.clone(), amy.clone(), low.clone()]);
    let reverse = summarize_class(Uuid::nil(), vec![low, amy, zed]);
    assert_eq!(forward.top_performer, Some(amy_id));
    assert_eq!(reverse.top_performer, Some(amy_id));

    let names: Vec<_> = forward.students.iter().map(|r| r.student.name.as_str()).collect();
    assert_eq!(names, ["Amy", "Zed", "Bob"]);
  }

  #[test]
  fn nobody_graded_means_no_top_performer_or_average() {
    let summary = summarize_class(Uuid::nil(), vec![row("A", &[]), row("B", &[])]);
    assert_eq!(summary.top_performer, None);
    assert_eq!(summary.class_average, None);
    assert_eq!(summary.histogram.f, 2);
  }

  #[test]
  fn groups_rows_by_student() {
    let (s1, s2) = (Uuid::new_v4(), Uuid::new_v4());
    let rows = vec![
      ClassScoreRow { student_id: s1, entry: entry(AssessmentKind::Quiz, 1.0, 2.0) },
      ClassScoreRow { student_id: s2, entry: entry(AssessmentKind::Quiz, 2.0, 2.0) },
      ClassScoreRow { student_id: s1, entry: entry(AssessmentKind::Assignment, 5.0, 10.0) },
    ];
    let grouped = group_by_student(rows);
    assert_eq!(grouped[&s1].len(), 2);
    assert_eq!(grouped[&s2].len(), 1);
  }
}
