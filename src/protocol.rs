//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::domain::GenerationState;
use crate::error::GenErrorKind;

/// DTO mirroring the SPA's `GenerationState` record: a status tag plus
/// nullable `result`/`error` slots. `kind` additionally exposes the tagged
/// error class so callers can branch without parsing text.
#[derive(Debug, Serialize)]
pub struct GenerationOut {
    pub status: &'static str,
    pub result: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<GenErrorKind>,
}

/// Convert the internal state into the public DTO.
pub fn to_out(state: &GenerationState) -> GenerationOut {
    match state {
        GenerationState::Idle => GenerationOut {
            status: "idle",
            result: None,
            error: None,
            kind: None,
        },
        GenerationState::Generating => GenerationOut {
            status: "generating",
            result: None,
            error: None,
            kind: None,
        },
        GenerationState::Success { result } => GenerationOut {
            status: "success",
            result: Some(result.clone()),
            error: None,
            kind: None,
        },
        GenerationState::Error { kind, message } => GenerationOut {
            status: "error",
            result: None,
            error: Some(message.clone()),
            kind: Some(*kind),
        },
    }
}

//
// Auth request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct SignupIn {
    pub name: String,
    pub email: String,
    // Accepted for API-shape compatibility; the simulation never stores it.
    #[serde(default)]
    #[allow(dead_code)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyIn {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendIn {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AuthUserOut {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AuthOut {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUserOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthOut {
    pub fn ok(message: &str) -> Self {
        Self { success: true, message: Some(message.into()), user: None, error: None }
    }

    pub fn ok_with_user(message: &str, user: User) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: Some(AuthUserOut { id: user.id, name: user.name, email: user.email }),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self { success: false, message: None, user: None, error: Some(error) }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
