//! Lab Assistant · Report Generation Backend
//!
//! - Axum HTTP API for the lab-report SPA
//! - Gemini integration (via environment variables)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   GEMINI_API_KEY     : required for generation; without it every attempt
//!                        fails with a configuration error
//!   GEMINI_BASE_URL    : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL       : default "gemini-3-flash-preview"
//!   REPORT_CONFIG_PATH : path to TOML config (prompt prose overrides)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod prompt;
mod gemini;
mod auth;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (generation state machine, Gemini client,
  // prompt config, auth store).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "labassist_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
