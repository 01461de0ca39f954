//! Error types for the question-bank codec.

use thiserror::Error;

/// A document that cannot be read at all. Problems with individual
/// questions are reported as [`crate::RowError`]s instead.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unsupported import format: {0:?}")]
  UnknownFormat(String),

  #[error("CSV header is missing the {0:?} column")]
  MissingColumn(&'static str),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("XML error: {0}")]
  Xml(String),

  #[error(transparent)]
  Core(#[from] gradebook_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
