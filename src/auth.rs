//! Simulated account signup and email verification.
//!
//! In-memory only: no mail is sent and nothing survives a restart. The
//! "verification email" is an info-level log line carrying the 6-digit code,
//! which is enough for the demo SPA's verification modal. Passwords are
//! accepted by the API shape but never stored.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const EMAIL_EXISTS: &str = "Email already exists";
pub const INVALID_TOKEN: &str = "This verification link is invalid or has expired.";
pub const RESEND_REPLY: &str = "If an account exists, a new link has been sent.";

/// A verified account.
#[derive(Clone, Debug)]
pub struct User {
  pub id: String,
  pub name: String,
  pub email: String,
}

#[derive(Clone, Debug)]
struct PendingSignup {
  name: String,
  email: String,
}

#[derive(Clone)]
pub struct AuthStore {
  /// Verified users keyed by email.
  users: Arc<RwLock<HashMap<String, User>>>,
  /// Pending signups keyed by verification code.
  pending: Arc<RwLock<HashMap<String, PendingSignup>>>,
}

impl AuthStore {
  pub fn new() -> Self {
    Self {
      users: Arc::new(RwLock::new(HashMap::new())),
      pending: Arc::new(RwLock::new(HashMap::new())),
    }
  }

  /// Register a pending signup and return its verification code.
  /// A repeated signup for a pending email rotates the code.
  #[instrument(level = "info", skip(self, name), fields(%email))]
  pub async fn signup(&self, name: &str, email: &str) -> Result<String, String> {
    if self.users.read().await.contains_key(email) {
      warn!(target: "labassist_backend", %email, "Signup rejected: already verified");
      return Err(EMAIL_EXISTS.into());
    }

    let mut pending = self.pending.write().await;
    pending.retain(|_, p| p.email != email);
    let code = fresh_code(&pending);
    pending.insert(
      code.clone(),
      PendingSignup { name: name.to_string(), email: email.to_string() },
    );

    // The simulated "email".
    info!(target: "labassist_backend", %email, %code, "Verification email sent (simulated)");
    Ok(code)
  }

  /// Consume a verification code and promote the pending signup to a user.
  #[instrument(level = "info", skip(self, token))]
  pub async fn verify(&self, token: &str) -> Result<User, String> {
    let pending = { self.pending.write().await.remove(token) };
    match pending {
      Some(p) => {
        let user = User { id: Uuid::new_v4().to_string(), name: p.name, email: p.email };
        self.users.write().await.insert(user.email.clone(), user.clone());
        info!(target: "labassist_backend", email = %user.email, "Email verified; account created");
        Ok(user)
      }
      None => {
        warn!(target: "labassist_backend", "Verification failed: unknown or expired code");
        Err(INVALID_TOKEN.into())
      }
    }
  }

  /// Rotate the pending code for `email`, if one exists. The HTTP reply is
  /// the same either way, so account existence is never disclosed.
  #[instrument(level = "info", skip(self), fields(%email))]
  pub async fn resend(&self, email: &str) -> Option<String> {
    let mut pending = self.pending.write().await;
    let existing = pending
      .iter()
      .find(|(_, p)| p.email == email)
      .map(|(code, _)| code.clone())?;
    // Pick the new code while the old one is still in the map, so rotation
    // can never hand back the same code.
    let code = fresh_code(&pending);
    let signup = pending.remove(&existing)?;
    pending.insert(code.clone(), signup);
    info!(target: "labassist_backend", %email, %code, "Verification email re-sent (simulated)");
    Some(code)
  }
}

/// 6-digit numeric code, unique among the currently pending ones.
fn fresh_code(pending: &HashMap<String, PendingSignup>) -> String {
  let mut rng = rand::thread_rng();
  loop {
    let code = rng.gen_range(100_000..=999_999).to_string();
    if !pending.contains_key(&code) {
      return code;
    }
  }
}
