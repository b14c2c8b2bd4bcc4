//! Loading report configuration (prompt text overrides) from TOML.
//!
//! See `ReportConfig` and `Prompts` for the expected schema. Everything has a
//! compiled-in default, so the file is optional.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ReportConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompt prose used by the Prompt Builder. Defaults reproduce the standard
/// academic lab-report wording; override in TOML to tune tone. The structural
/// template (section markers, fences, image alts) is fixed in code and is not
/// configurable.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  /// Role preamble naming the output format.
  pub report_preamble: String,
  /// Numbered rendering rules the model must follow.
  pub report_instructions: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      report_preamble: "Role:\nYou are an academic programming assistant. Generate a C++ lab report.".into(),
      report_instructions: "INSTRUCTIONS:\n\
        1. **Description**: Format each problem description into a clear, academic problem statement. Preserve newlines, bullet points, and input/output specifications. Use bold text for labels like **Input:** or **Output:** if applicable. Keep any embedded markup unescaped and exactly as given.\n\
        2. **Code**: Reproduce every code block exactly as provided. Do not modify, reformat, or rename identifiers.\n\
        3. **Output Section**: Replace [SHORT OUTPUT SUMMARY] with a 1-sentence summary of the program's result, kept inside the '* *'.\n\
        4. **Discussion**: Replace [ACADEMIC DISCUSSION] with a concise (2-3 lines) academic discussion on the concepts used.\n\
        5. **Structure**: Emit the REQUIRED FORMAT below exactly, filling in the bracketed placeholders. Keep all other text, markers, and HTML attributes verbatim.".into(),
    }
  }
}

/// Attempt to load `ReportConfig` from REPORT_CONFIG_PATH. On any parsing/IO
/// error, returns None and the compiled-in defaults apply.
pub fn load_report_config_from_env() -> Option<ReportConfig> {
  let path = std::env::var("REPORT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ReportConfig>(&s) {
      Ok(cfg) => {
        info!(target: "labassist_backend", %path, "Loaded report config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "labassist_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "labassist_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
