//! Quiz questions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  #[default]
  MultipleChoice,
  TrueFalse,
  ShortAnswer,
}

/// A stored question. `position` orders questions within their quiz,
/// starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub question_id:   Uuid,
  pub assessment_id: Uuid,
  pub position:      u32,
  pub prompt:        String,
  pub kind:          QuestionKind,
  /// Answer choices; empty unless `kind` is multiple choice.
  pub options:       Vec<String>,
  pub answer:        String,
  pub points:        f64,
}

/// Input to [`crate::store::GradeStore::add_questions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
  pub prompt:  String,
  #[serde(default)]
  pub kind:    QuestionKind,
  #[serde(default)]
  pub options: Vec<String>,
  pub answer:  String,
  pub points:  f64,
}

impl NewQuestion {
  /// Validate and canonicalise a question.
  ///
  /// - Multiple-choice answers may name an option by text (any case) or by
  ///   letter (`A` is the first slot, blank or not); either way the stored
  ///   answer is the option text.
  /// - True/false answers become `"true"` or `"false"`.
  /// - Options are dropped for anything but multiple choice.
  pub fn normalized(self) -> Result<Self> {
    let prompt = self.prompt.trim().to_owned();
    if prompt.is_empty() {
      return Err(Error::validation("Question text is required"));
    }
    if !self.points.is_finite() || self.points <= 0.0 {
      return Err(Error::validation("Points must be a positive number"));
    }

    let answer = self.answer.trim();
    let (options, answer) = match self.kind {
      QuestionKind::MultipleChoice => {
        // Blank slots keep their place until the answer letter is resolved.
        let slots: Vec<String> =
          self.options.iter().map(|o| o.trim().to_owned()).collect();
        if slots.iter().filter(|o| !o.is_empty()).count() < 2 {
          return Err(Error::validation(
            "Multiple choice questions need at least two options",
          ));
        }
        let answer = match_option(&slots, answer)?;
        let options: Vec<String> =
          slots.into_iter().filter(|o| !o.is_empty()).collect();
        (options, answer)
      }
      QuestionKind::TrueFalse => {
        let answer = match answer.to_ascii_lowercase().as_str() {
          "true" | "t" | "yes" | "1" => "true",
          "false" | "f" | "no" | "0" => "false",
          _ => {
            return Err(Error::validation(
              "True/false answer must be true or false",
            ));
          }
        };
        (Vec::new(), answer.to_owned())
      }
      QuestionKind::ShortAnswer => {
        if answer.is_empty() {
          return Err(Error::validation("Answer is required"));
        }
        (Vec::new(), answer.to_owned())
      }
    };

    Ok(Self { prompt, kind: self.kind, options, answer, points: self.points })
  }
}

/// Resolve an answer against the option slots: exact text first, then a
/// single option letter. Letters count blank slots, so `C` is always the
/// third column even when the second is empty.
fn match_option(slots: &[String], answer: &str) -> Result<String> {
  let no_match =
    || Error::validation(format!("Answer {answer:?} does not match any option"));
  if answer.is_empty() {
    return Err(no_match());
  }
  if let Some(o) = slots.iter().find(|o| o.eq_ignore_ascii_case(answer)) {
    return Ok(o.clone());
  }
  let mut chars = answer.chars();
  match (chars.next(), chars.next()) {
    (Some(c), None) if c.is_ascii_alphabetic() => {
      let idx = (c.to_ascii_uppercase() as u8 - b'A') as usize;
      match slots.get(idx) {
        Some(o) if o.is_empty() => Err(Error::validation(format!(
          "Answer {answer:?} points at a blank option"
        ))),
        Some(o) => Ok(o.clone()),
        None => Err(no_match()),
      }
    }
    _ => Err(no_match()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn mc(options: &[&str], answer: &str) -> NewQuestion {
    NewQuestion {
      prompt:  "Which planet is largest?".into(),
      kind:    QuestionKind::MultipleChoice,
      options: options.iter().map(|s| s.to_string()).collect(),
      answer:  answer.into(),
      points:  2.0,
    }
  }

  #[test]
  fn multiple_choice_answer_by_text_or_letter() {
    let by_text = mc(&["Mars", "Jupiter", "Venus"], "jupiter")
      .normalized()
      .unwrap();
    assert_eq!(by_text.answer, "Jupiter");

    let by_letter = mc(&["Mars", "Jupiter", "Venus"], "b").normalized().unwrap();
    assert_eq!(by_letter.answer, "Jupiter");
  }

  #[test]
  fn option_text_wins_over_letter() {
    let q = mc(&["B", "A"], "A").normalized().unwrap();
    assert_eq!(q.answer, "A");
  }

  #[test]
  fn multiple_choice_rejects_unknown_answer_and_short_option_list() {
    assert!(mc(&["Mars", "Jupiter"], "Pluto").normalized().is_err());
    assert!(mc(&["Mars", "Jupiter"], "E").normalized().is_err());
    assert!(mc(&["Mars", "  "], "Mars").normalized().is_err());
  }

  #[test]
  fn answer_letters_count_blank_slots() {
    let q = mc(&["Mercury", "", "Jupiter", "Venus"], "C")
      .normalized()
      .unwrap();
    assert_eq!(q.answer, "Jupiter");
    assert_eq!(q.options, ["Mercury", "Jupiter", "Venus"]);

    let err = mc(&["Mercury", "", "Jupiter"], "b").normalized().unwrap_err();
    assert_eq!(
      err.to_string(),
      "Answer \"b\" points at a blank option"
    );
  }

  #[test]
  fn true_false_is_canonicalised_and_drops_options() {
    let q = NewQuestion {
      prompt:  "The sun is a star.".into(),
      kind:    QuestionKind::TrueFalse,
      options: vec!["ignored".into()],
      answer:  "T".into(),
      points:  1.0,
    }
    .normalized()
    .unwrap();
    assert_eq!(q.answer, "true");
    assert!(q.options.is_empty());
  }

  #[test]
  fn rejects_blank_prompt_and_bad_points() {
    let mut q = mc(&["a", "b"], "a");
    q.prompt = "  ".into();
    assert!(q.normalized().is_err());

    let mut q = mc(&["a", "b"], "a");
    q.points = 0.0;
    assert!(q.normalized().is_err());
  }
}
