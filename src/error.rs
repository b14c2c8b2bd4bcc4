//! Tagged generation errors.
//!
//! Every failure of a generation attempt is one of four kinds; callers branch
//! on the kind while the UI only renders the message. All four are terminal
//! for the attempt (no automatic retries) and map onto the `error` state.

use serde::Serialize;
use thiserror::Error;

/// Error kind exposed alongside the message in the `error` state.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenErrorKind {
  /// Detected locally before any I/O (missing lab number/title or first code).
  Validation,
  /// Missing credential; no network attempt is made.
  Configuration,
  /// The backend call failed or returned a non-success status.
  Backend,
  /// The backend replied with no usable text.
  EmptyResponse,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenError {
  #[error("{0}")]
  Validation(String),
  #[error("{0}")]
  Configuration(String),
  #[error("{0}")]
  Backend(String),
  #[error("Empty response from Gemini.")]
  EmptyResponse,
}

impl GenError {
  pub fn kind(&self) -> GenErrorKind {
    match self {
      GenError::Validation(_) => GenErrorKind::Validation,
      GenError::Configuration(_) => GenErrorKind::Configuration,
      GenError::Backend(_) => GenErrorKind::Backend,
      GenError::EmptyResponse => GenErrorKind::EmptyResponse,
    }
  }
}
