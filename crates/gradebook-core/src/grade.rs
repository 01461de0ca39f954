//! Letter grades and grade entries.
//!
//! A grade entry is the one recorded score of one student against one
//! assessment. Entries are upserted, never appended: the store keys them by
//! `(student_id, assessment_id)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::{Error, Result, assessment::Assessment};

// ─── Letter grades ───────────────────────────────────────────────────────────

/// The thirteen fine-grained letter grades, best first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
)]
pub enum LetterGrade {
  #[serde(rename = "A+")]
  #[strum(to_string = "A+")]
  APlus,
  #[serde(rename = "A")]
  #[strum(to_string = "A")]
  A,
  #[serde(rename = "A-")]
  #[strum(to_string = "A-")]
  AMinus,
  #[serde(rename = "B+")]
  #[strum(to_string = "B+")]
  BPlus,
  #[serde(rename = "B")]
  #[strum(to_string = "B")]
  B,
  #[serde(rename = "B-")]
  #[strum(to_string = "B-")]
  BMinus,
  #[serde(rename = "C+")]
  #[strum(to_string = "C+")]
  CPlus,
  #[serde(rename = "C")]
  #[strum(to_string = "C")]
  C,
  #[serde(rename = "C-")]
  #[strum(to_string = "C-")]
  CMinus,
  #[serde(rename = "D+")]
  #[strum(to_string = "D+")]
  DPlus,
  #[serde(rename = "D")]
  #[strum(to_string = "D")]
  D,
  #[serde(rename = "D-")]
  #[strum(to_string = "D-")]
  DMinus,
  #[serde(rename = "F")]
  #[strum(to_string = "F")]
  F,
}

/// The five coarse bands used by the class histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeBand {
  A,
  B,
  C,
  D,
  F,
}

impl LetterGrade {
  /// The band is the letter's first character.
  pub fn band(self) -> GradeBand {
    use LetterGrade::*;
    match self {
      APlus | A | AMinus => GradeBand::A,
      BPlus | B | BMinus => GradeBand::B,
      CPlus | C | CMinus => GradeBand::C,
      DPlus | D | DMinus => GradeBand::D,
      F => GradeBand::F,
    }
  }
}

/// Lower bounds, checked top-down; the first one met wins.
const THRESHOLDS: [(f64, LetterGrade); 12] = [
  (97.0, LetterGrade::APlus),
  (93.0, LetterGrade::A),
  (90.0, LetterGrade::AMinus),
  (87.0, LetterGrade::BPlus),
  (83.0, LetterGrade::B),
  (80.0, LetterGrade::BMinus),
  (77.0, LetterGrade::CPlus),
  (73.0, LetterGrade::C),
  (70.0, LetterGrade::CMinus),
  (67.0, LetterGrade::DPlus),
  (63.0, LetterGrade::D),
  (60.0, LetterGrade::DMinus),
];

/// Map a percentage to its letter grade.
///
/// The input is not range-checked; anything below 60 (including negatives
/// and NaN) is an `F`.
pub fn compute_letter_grade(percentage: f64) -> LetterGrade {
  THRESHOLDS
    .iter()
    .find(|(min, _)| percentage >= *min)
    .map(|(_, letter)| *letter)
    .unwrap_or(LetterGrade::F)
}

/// `score / max_points * 100`, or 0 when there is nothing to divide by.
pub fn percentage(score: f64, max_points: f64) -> f64 {
  if max_points > 0.0 { score / max_points * 100.0 } else { 0.0 }
}

/// Round to two decimal places, the precision percentages are reported at.
pub fn round_percentage(p: f64) -> f64 { (p * 100.0).round() / 100.0 }

/// Serialize a percentage rounded for display. The in-memory value stays
/// exact so letters and rankings are computed from the unrounded figure.
pub fn serialize_percentage<S: Serializer>(
  p: &f64,
  serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
  serializer.serialize_f64(round_percentage(*p))
}

pub fn serialize_percentage_opt<S: Serializer>(
  p: &Option<f64>,
  serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
  match p {
    Some(p) => serializer.serialize_some(&round_percentage(*p)),
    None => serializer.serialize_none(),
  }
}

/// Check `0 <= score <= max_points`. The error message names the valid range.
pub fn validate_score(score: f64, max_points: f64) -> Result<()> {
  if score.is_finite() && (0.0..=max_points).contains(&score) {
    Ok(())
  } else {
    Err(Error::Validation(format!(
      "Invalid grade (must be 0-{max_points})"
    )))
  }
}

// ─── Grade entry ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeEntry {
  /// Assigned on first insert and kept across later upserts.
  pub grade_id:      Uuid,
  pub student_id:    Uuid,
  pub assessment_id: Uuid,
  pub score:         f64,
  #[serde(serialize_with = "serialize_percentage")]
  pub percentage:    f64,
  pub letter:        LetterGrade,
  pub feedback:      Option<String>,
  pub updated_at:    DateTime<Utc>,
}

impl GradeEntry {
  /// Build the entry for an already-validated score. Percentage and letter
  /// are derived here so every write path computes them the same way.
  pub fn new(
    student_id: Uuid,
    assessment: &Assessment,
    score: f64,
    feedback: Option<String>,
  ) -> Self {
    let percentage = percentage(score, assessment.max_points);
    Self {
      grade_id: Uuid::new_v4(),
      student_id,
      assessment_id: assessment.assessment_id,
      score,
      percentage,
      letter: compute_letter_grade(percentage),
      feedback: feedback
        .map(|f| f.trim().to_owned())
        .filter(|f| !f.is_empty()),
      updated_at: Utc::now(),
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;
  use crate::assessment::AssessmentKind;

  #[test]
  fn letter_boundaries() {
    assert_eq!(compute_letter_grade(100.0), LetterGrade::APlus);
    assert_eq!(compute_letter_grade(97.0), LetterGrade::APlus);
    assert_eq!(compute_letter_grade(96.99), LetterGrade::A);
    assert_eq!(compute_letter_grade(96.0), LetterGrade::A);
    assert_eq!(compute_letter_grade(93.0), LetterGrade::A);
    assert_eq!(compute_letter_grade(92.99), LetterGrade::AMinus);
    assert_eq!(compute_letter_grade(90.0), LetterGrade::AMinus);
    assert_eq!(compute_letter_grade(87.0), LetterGrade::BPlus);
    assert_eq!(compute_letter_grade(83.0), LetterGrade::B);
    assert_eq!(compute_letter_grade(80.0), LetterGrade::BMinus);
    assert_eq!(compute_letter_grade(77.0), LetterGrade::CPlus);
    assert_eq!(compute_letter_grade(73.0), LetterGrade::C);
    assert_eq!(compute_letter_grade(70.0), LetterGrade::CMinus);
    assert_eq!(compute_letter_grade(67.0), LetterGrade::DPlus);
    assert_eq!(compute_letter_grade(63.0), LetterGrade::D);
    assert_eq!(compute_letter_grade(60.0), LetterGrade::DMinus);
    assert_eq!(compute_letter_grade(59.99), LetterGrade::F);
    assert_eq!(compute_letter_grade(0.0), LetterGrade::F);
  }

  #[test]
  fn out_of_range_inputs_are_not_rejected() {
    assert_eq!(compute_letter_grade(140.0), LetterGrade::APlus);
    assert_eq!(compute_letter_grade(-3.0), LetterGrade::F);
    assert_eq!(compute_letter_grade(f64::NAN), LetterGrade::F);
  }

  #[test]
  fn letter_quality_never_improves_as_percentage_drops() {
    // LetterGrade::iter() yields best-first, so the variant index is a rank.
    let rank = |l: LetterGrade| LetterGrade::iter().position(|x| x == l).unwrap();
    let mut previous = rank(compute_letter_grade(100.0));
    let mut p = 100.0;
    while p >= 0.0 {
      let current = rank(compute_letter_grade(p));
      assert!(current >= previous, "grade improved at {p}");
      previous = current;
      p -= 0.25;
    }
  }

  #[test]
  fn letters_render_and_parse() {
    assert_eq!(LetterGrade::APlus.to_string(), "A+");
    assert_eq!(LetterGrade::DMinus.to_string(), "D-");
    for letter in LetterGrade::iter() {
      assert_eq!(letter.to_string().parse::<LetterGrade>().unwrap(), letter);
    }
    assert_eq!(
      serde_json::to_string(&LetterGrade::BPlus).unwrap(),
      "\"B+\""
    );
  }

  #[test]
  fn bands_group_by_first_character() {
    for letter in LetterGrade::iter() {
      let first = letter.to_string().chars().next().unwrap();
      let band = format!("{:?}", letter.band());
      assert_eq!(band, first.to_string());
    }
  }

  #[test]
  fn score_bounds_are_inclusive() {
    assert!(validate_score(0.0, 50.0).is_ok());
    assert!(validate_score(50.0, 50.0).is_ok());
    assert!(validate_score(-1.0, 50.0).is_err());
    assert!(validate_score(50.01, 50.0).is_err());
    assert!(validate_score(f64::NAN, 50.0).is_err());
  }

  #[test]
  fn score_error_names_the_range() {
    let err = validate_score(101.0, 100.0).unwrap_err();
    assert_eq!(err.to_string(), "Invalid grade (must be 0-100)");
  }

  #[test]
  fn entry_derives_percentage_and_letter() {
    let assessment = Assessment {
      assessment_id: Uuid::new_v4(),
      class_id:      Uuid::nil(),
      kind:          AssessmentKind::Quiz,
      title:         "Quiz 1".into(),
      max_points:    20.0,
      due_at:        None,
      created_at:    Utc::now(),
    };
    let entry = GradeEntry::new(
      Uuid::nil(),
      &assessment,
      18.0,
      Some("  nice work ".into()),
    );
    assert_eq!(entry.percentage, 90.0);
    assert_eq!(entry.letter, LetterGrade::AMinus);
    assert_eq!(entry.feedback.as_deref(), Some("nice work"));

    let blank = GradeEntry::new(Uuid::nil(), &assessment, 0.0, Some("  ".into()));
    assert_eq!(blank.feedback, None);
  }
}
