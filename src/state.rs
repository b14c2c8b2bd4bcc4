//! Application state: the generation state machine, prompt configuration,
//! optional Gemini client, and the simulated signup store.
//!
//! This module owns:
//!   - the single per-session `GenerationState` value
//!   - the transition rules around it (validate -> invoke -> settle)
//!   - the auth store for the simulated signup flow
//!
//! Only one generation may be in flight at a time: `Generating` acts as a
//! mutual-exclusion gate and a request arriving while it is set is rejected
//! as a no-op. State is only ever replaced through the rules here (or the
//! explicit reset), so the single RwLock is all the synchronization needed.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::auth::AuthStore;
use crate::config::{load_report_config_from_env, Prompts};
use crate::domain::{GenerationState, LabData};
use crate::error::GenError;
use crate::gemini::Gemini;
use crate::prompt::build_report_prompt;

#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<RwLock<GenerationState>>,
    pub auth: AuthStore,
    pub gemini: Option<Gemini>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load prompt config, init the Gemini client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let prompts = load_report_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let gemini = Gemini::from_env();
        if let Some(g) = &gemini {
            info!(target: "labassist_backend", base_url = %g.base_url, model = %g.model, "Gemini enabled.");
        } else {
            warn!(target: "labassist_backend", "Gemini disabled (no GEMINI_API_KEY). Generation requests will fail with a configuration error.");
        }

        Self {
            generation: Arc::new(RwLock::new(GenerationState::Idle)),
            auth: AuthStore::new(),
            gemini,
            prompts,
        }
    }

    /// Current generation state, cloned for the caller.
    pub async fn snapshot(&self) -> GenerationState {
        self.generation.read().await.clone()
    }

    /// External reset action: back to `Idle`. Does not abort an in-flight
    /// backend call; a completion landing afterwards overwrites the state.
    #[instrument(level = "info", skip(self))]
    pub async fn reset(&self) {
        *self.generation.write().await = GenerationState::Idle;
        info!(target: "report", "Generation state reset");
    }

    /// Run one full generation attempt against the configured Gemini client.
    ///
    /// The token marks the suspension point for a future cancel/timeout
    /// policy; callers that don't cancel pass a fresh one.
    #[instrument(level = "info", skip(self, data, cancel), fields(lab_number = %data.info.lab_number, problems = data.problems.len()))]
    pub async fn generate(&self, data: LabData, cancel: CancellationToken) -> GenerationState {
        let gemini = self.gemini.clone();
        self.run_generation(data, move |prompt| async move {
            let g = match gemini {
                Some(g) => g,
                None => {
                    return Err(GenError::Configuration(
                        "API Key is missing. Please check your environment configuration.".into(),
                    ))
                }
            };
            tokio::select! {
                _ = cancel.cancelled() => Err(GenError::Backend("Report generation was cancelled.".into())),
                res = g.generate(&prompt) => res,
            }
        })
        .await
    }

    /// Transition core, generic over the backend call so tests can drive it
    /// without a network: guards -> `Generating` gate -> invoke -> settle.
    pub(crate) async fn run_generation<F, Fut>(&self, data: LabData, call: F) -> GenerationState
    where
        F: FnOnce(String) -> Fut,
        Fut: std::future::Future<Output = Result<String, GenError>>,
    {
        {
            let mut st = self.generation.write().await;
            if *st == GenerationState::Generating {
                warn!(target: "report", "Generation already in flight; request ignored");
                return st.clone();
            }
            if let Err(e) = data.validate() {
                info!(target: "report", kind = ?e.kind(), "Validation failed; no backend call made");
                *st = GenerationState::from_error(&e);
                return st.clone();
            }
            *st = GenerationState::Generating;
        }

        // Lock released across the backend call; the gate above keeps this
        // path single-entrant.
        let prompt = build_report_prompt(&data, &self.prompts, Local::now().date_naive());
        info!(target: "report", prompt_len = prompt.len(), "Prompt built; invoking backend");

        let settled = match call(prompt).await {
            Ok(text) => GenerationState::Success { result: text },
            Err(e) => {
                warn!(target: "report", kind = ?e.kind(), error = %e, "Generation attempt failed");
                GenerationState::from_error(&e)
            }
        };

        *self.generation.write().await = settled.clone();
        settled
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::sync::oneshot;

    use super::*;
    use crate::domain::{LabInfo, Problem};
    use crate::error::GenErrorKind;

    fn test_state() -> AppState {
        AppState {
            generation: Arc::new(RwLock::new(GenerationState::Idle)),
            auth: AuthStore::new(),
            gemini: None,
            prompts: Prompts::default(),
        }
    }

    fn valid_lab() -> LabData {
        LabData {
            info: LabInfo {
                student_id: String::new(),
                lab_number: "4".into(),
                lab_title: "Arrays".into(),
                codeforces_link: String::new(),
            },
            problems: vec![Problem {
                id: "1".into(),
                title: String::new(),
                description: String::new(),
                code: "int main(){return 0;}".into(),
            }],
        }
    }

    #[tokio::test]
    async fn blank_title_errors_without_invoking_backend() {
        let state = test_state();
        let mut data = valid_lab();
        data.info.lab_title = "  ".into();

        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let out = state
            .run_generation(data, move |_p| async move {
                flag.store(true, Ordering::SeqCst);
                Ok("unreachable".into())
            })
            .await;

        assert!(!called.load(Ordering::SeqCst));
        match out {
            GenerationState::Error { kind, message } => {
                assert_eq!(kind, GenErrorKind::Validation);
                assert_eq!(message, "Please enter Lab Number and Title.");
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn whitespace_code_errors_without_invoking_backend() {
        let state = test_state();
        let mut data = valid_lab();
        data.problems[0].code = " \n\t ".into();

        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let out = state
            .run_generation(data, move |_p| async move {
                flag.store(true, Ordering::SeqCst);
                Ok("unreachable".into())
            })
            .await;

        assert!(!called.load(Ordering::SeqCst));
        match out {
            GenerationState::Error { kind, .. } => assert_eq!(kind, GenErrorKind::Validation),
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn successful_attempt_carries_the_reply() {
        let state = test_state();
        let out = state
            .run_generation(valid_lab(), |_p| async { Ok("## *Lab No : 4*".to_string()) })
            .await;
        assert_eq!(out, GenerationState::Success { result: "## *Lab No : 4*".into() });
        assert_eq!(state.snapshot().await, out);
    }

    #[tokio::test]
    async fn empty_reply_settles_as_error_never_success() {
        let state = test_state();
        let out = state
            .run_generation(valid_lab(), |_p| async { Err(GenError::EmptyResponse) })
            .await;
        match out {
            GenerationState::Error { kind, .. } => assert_eq!(kind, GenErrorKind::EmptyResponse),
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_state_is_cleared_by_the_next_success() {
        let state = test_state();
        state
            .run_generation(valid_lab(), |_p| async { Err(GenError::Backend("boom".into())) })
            .await;
        let out = state
            .run_generation(valid_lab(), |_p| async { Ok("report".to_string()) })
            .await;
        assert_eq!(out, GenerationState::Success { result: "report".into() });
        assert_eq!(state.snapshot().await, out);
    }

    #[tokio::test]
    async fn missing_credential_is_a_configuration_error() {
        let state = test_state();
        let out = state.generate(valid_lab(), CancellationToken::new()).await;
        match out {
            GenerationState::Error { kind, message } => {
                assert_eq!(kind, GenErrorKind::Configuration);
                assert!(message.contains("API Key is missing"));
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn overlapping_request_is_rejected_and_does_not_clobber_the_first() {
        let state = test_state();
        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (gate_tx, gate_rx) = oneshot::channel::<()>();

        let first_state = state.clone();
        let first = tokio::spawn(async move {
            first_state
                .run_generation(valid_lab(), move |_p| async move {
                    let _ = started_tx.send(());
                    let _ = gate_rx.await;
                    Ok("final report".to_string())
                })
                .await
        });

        // Wait until the first attempt holds the gate.
        started_rx.await.unwrap();

        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let second = state
            .run_generation(valid_lab(), move |_p| async move {
                flag.store(true, Ordering::SeqCst);
                Ok("stale overwrite".into())
            })
            .await;

        assert_eq!(second, GenerationState::Generating);
        assert!(!called.load(Ordering::SeqCst));

        gate_tx.send(()).unwrap();
        let settled = first.await.unwrap();
        assert_eq!(settled, GenerationState::Success { result: "final report".into() });
        assert_eq!(state.snapshot().await, settled);
    }

    #[tokio::test]
    async fn cancelled_token_aborts_at_the_suspension_point() {
        let mut state = test_state();
        // Unroutable backend: the cancelled token must win the select before
        // the transport ever settles.
        state.gemini = Some(Gemini {
            client: reqwest::Client::new(),
            api_key: "k".into(),
            base_url: "http://127.0.0.1:1".into(),
            model: "m".into(),
        });
        let token = CancellationToken::new();
        token.cancel();

        let out = state.generate(valid_lab(), token).await;
        match out {
            GenerationState::Error { kind, message } => {
                assert_eq!(kind, GenErrorKind::Backend);
                assert!(message.contains("cancelled"));
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn reset_returns_to_idle() {
        let state = test_state();
        state
            .run_generation(valid_lab(), |_p| async { Ok("report".to_string()) })
            .await;
        state.reset().await;
        assert_eq!(state.snapshot().await, GenerationState::Idle);
    }
}
