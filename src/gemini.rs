//! Minimal Gemini client for our one use-case.
//!
//! We only call `generateContent` with a single text part and expect a plain
//! text reply. The call is a single atomic request/response: no retries, no
//! streaming, no caching. Calls are instrumented and log model name, latency,
//! and response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::GenError;
use crate::util::trunc_for_log;

const X_GOOG_API_KEY: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl Gemini {
  /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("GEMINI_API_KEY").ok()?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// Send the built instruction string and return the raw reply text.
  ///
  /// An empty (or whitespace-only) reply is a backend failure, never a
  /// success. Thinking is disabled so the reply is the report text alone.
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  pub async fn generate(&self, prompt: &str) -> Result<String, GenError> {
    let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
    let req = GenerateContentRequest {
      contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
      generation_config: GenerationConfig {
        thinking_config: ThinkingConfig { thinking_budget: 0 },
      },
    };

    let start = std::time::Instant::now();
    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "labassist-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(X_GOOG_API_KEY, &self.api_key)
      .json(&req)
      .send()
      .await
      .map_err(|e| GenError::Backend(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_gemini_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      error!(target: "report", %status, error = %msg, "Gemini call failed");
      return Err(GenError::Backend(format!("Gemini HTTP {}: {}", status, msg)));
    }

    let body: GenerateContentResponse =
      res.json().await.map_err(|e| GenError::Backend(e.to_string()))?;
    if let Some(usage) = &body.usage_metadata {
      info!(
        prompt_tokens = ?usage.prompt_token_count,
        completion_tokens = ?usage.candidates_token_count,
        total_tokens = ?usage.total_token_count,
        "Gemini usage"
      );
    }

    let text: String = body
      .candidates
      .first()
      .and_then(|c| c.content.as_ref())
      .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(""))
      .unwrap_or_default()
      .trim()
      .to_string();

    if text.is_empty() {
      return Err(GenError::EmptyResponse);
    }

    info!(elapsed = ?start.elapsed(), reply_len = text.len(), "Report text received");
    Ok(text)
  }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}
#[derive(Serialize)]
struct Content {
  parts: Vec<Part>,
}
#[derive(Serialize, Deserialize)]
struct Part {
  #[serde(default)]
  text: String,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  thinking_config: ThinkingConfig,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
  thinking_budget: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default)]
  usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<CandidateContent>,
}
#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<Part>,
}
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)]
  prompt_token_count: Option<u32>,
  #[serde(default)]
  candidates_token_count: Option<u32>,
  #[serde(default)]
  total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
