//! HTTP endpoint handlers. These are thin wrappers that forward to the state
//! machine and auth store. Each handler is instrumented with its key inputs.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::domain::LabData;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

/// Run one generation attempt to completion and reply with the settled state.
/// The handler suspends for the duration of the backend call; an overlapping
/// request gets the unchanged `generating` state back.
#[instrument(level = "info", skip(state, body), fields(lab_number = %body.info.lab_number, problems = body.problems.len()))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LabData>,
) -> impl IntoResponse {
  let settled = state.generate(body, CancellationToken::new()).await;
  let out = to_out(&settled);
  info!(target: "report", status = out.status, "Generation request settled");
  Json(out)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_generation_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(to_out(&state.snapshot().await))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  state.reset().await;
  Json(to_out(&state.snapshot().await))
}

#[instrument(level = "info", skip(state, body), fields(email = %body.email))]
pub async fn http_post_signup(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SignupIn>,
) -> impl IntoResponse {
  match state.auth.signup(&body.name, &body.email).await {
    Ok(_code) => Json(AuthOut::ok("Verification email sent")),
    Err(e) => Json(AuthOut::err(e)),
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_verify(
  State(state): State<Arc<AppState>>,
  Json(body): Json<VerifyIn>,
) -> impl IntoResponse {
  match state.auth.verify(&body.token).await {
    Ok(user) => Json(AuthOut::ok_with_user("Email verified successfully!", user)),
    Err(e) => Json(AuthOut::err(e)),
  }
}

#[instrument(level = "info", skip(state, body), fields(email = %body.email))]
pub async fn http_post_resend(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ResendIn>,
) -> impl IntoResponse {
  // Same reply whether or not a pending signup exists.
  let _ = state.auth.resend(&body.email).await;
  Json(AuthOut::ok(crate::auth::RESEND_REPLY))
}
