//! Domain models: lab submissions and the generation lifecycle.

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenErrorKind};

/// One sub-task within a lab: its own statement and source code.
/// Constructed and mutated entirely by the form layer; the pipeline only
/// reads a snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Problem {
  /// Opaque id assigned at creation by the form layer, unique per lab.
  pub id: String,
  /// Optional short label. When empty, the positional "Problem N" default
  /// is substituted at render time and never stored.
  #[serde(default)]
  pub title: String,
  /// Free-text problem statement; empty becomes an explicit
  /// "No description provided." marker in the prompt.
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub code: String,
}

impl Problem {
  /// Label shown for this problem: the stored title, or "Problem N".
  #[allow(dead_code)]
  pub fn display_title(&self, index: usize) -> String {
    let t = self.title.trim();
    if t.is_empty() { format!("Problem {}", index + 1) } else { t.to_string() }
  }
}

/// Lab metadata entered in the form header.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabInfo {
  /// Substituted into image alt placeholders; blank falls back to "ID".
  #[serde(default)]
  pub student_id: String,
  pub lab_number: String,
  pub lab_title: String,
  /// Blank is rendered as a literal "link will be added later" sentence.
  #[serde(default)]
  pub codeforces_link: String,
}

/// A full submission snapshot: metadata plus the ordered problem list.
/// Problem order is significant and mirrors the numbering in the report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabData {
  #[serde(flatten)]
  pub info: LabInfo,
  #[serde(default)]
  pub problems: Vec<Problem>,
}

impl LabData {
  /// Guards checked before any I/O. Order matters: metadata first, then the
  /// first problem's code. Whitespace-only counts as blank.
  pub fn validate(&self) -> Result<(), GenError> {
    if self.info.lab_number.trim().is_empty() || self.info.lab_title.trim().is_empty() {
      return Err(GenError::Validation("Please enter Lab Number and Title.".into()));
    }
    match self.problems.first() {
      Some(p) if !p.code.trim().is_empty() => Ok(()),
      _ => Err(GenError::Validation(
        "Please provide at least one problem with code.".into(),
      )),
    }
  }
}

/// Lifecycle of the single per-session generation attempt.
///
/// `Idle` is re-entered only through the explicit reset action; a finished
/// attempt (`Success`/`Error`) transitions back through `Generating` on the
/// next request.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationState {
  Idle,
  Generating,
  Success { result: String },
  Error { kind: GenErrorKind, message: String },
}

impl GenerationState {
  pub fn from_error(e: &GenError) -> Self {
    GenerationState::Error { kind: e.kind(), message: e.to_string() }
  }
}
