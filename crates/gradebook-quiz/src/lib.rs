//! Question-bank codec for quiz assessments.
//!
//! Parses CSV, JSON and XML question banks into
//! [`gradebook_core::question::NewQuestion`]s. A bad question is reported
//! at its position and the rest of the bank still imports; only a document
//! that cannot be read at all fails as a whole.
//!
//! # Quick start
//!
//! ```no_run
//! use gradebook_quiz::{ImportFormat, parse};
//!
//! let csv = "question,type,points,option_a,option_b,option_c,option_d,answer\n\
//!            Is water wet?,tf,1,,,,,true\n";
//! let bank = parse(ImportFormat::Csv, csv).unwrap();
//! println!("{} ok, {} bad", bank.questions.len(), bank.errors.len());
//! ```

pub mod error;
mod import;
mod parse;

use std::fmt;

pub use error::{Error, Result};
use gradebook_core::question::NewQuestion;
pub use import::{ImportSummary, import_questions};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ─── Public types ────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
  Csv,
  Json,
  Xml,
}

impl ImportFormat {
  /// Parse a format name such as `"csv"` (any case).
  pub fn from_name(name: &str) -> Result<Self> {
    name
      .trim()
      .parse()
      .map_err(|_| Error::UnknownFormat(name.to_owned()))
  }
}

/// A question that could not be imported. `row` counts questions from 1 in
/// document order (the CSV header is not a row).
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
  pub row:    usize,
  pub reason: String,
}

impl fmt::Display for RowError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Row {}: {}", self.row, self.reason)
  }
}

/// Every question in a bank, split into the valid ones (already
/// normalized) and the rejected ones.
#[derive(Debug, Default)]
pub struct ParsedBank {
  pub questions: Vec<NewQuestion>,
  pub errors:    Vec<RowError>,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a question bank in the given format.
pub fn parse(format: ImportFormat, input: &str) -> Result<ParsedBank> {
  match format {
    ImportFormat::Csv => parse::parse_csv(input),
    ImportFormat::Json => parse::parse_json(input),
    ImportFormat::Xml => parse::parse_xml(input),
  }
}
