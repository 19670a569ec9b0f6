use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::AuthError;

/// Authenticated identity as far as the app cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Tokens plus the user they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) after which the access token is stale.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl AuthSession {
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now_unix)
    }
}

/// The observable auth signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub loading: bool,
    pub user: Option<User>,
}

impl AuthState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            loading: false,
            user: None,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            loading: false,
            user: Some(user),
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Outcome of a successful sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Account created; the user must confirm their email before signing in.
    ConfirmationRequired,
    /// Account created and a session issued right away.
    SignedIn(User),
}

/// Every authentication backend implements this trait.
///
/// Providers own their session lifecycle and publish `{loading, user}` on a
/// `watch` channel; everything else in the app only observes it.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Unique identifier (e.g. "supabase", "local").
    fn name(&self) -> &str;

    /// Receiver for the `{loading, user}` signal.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    fn current_user(&self) -> Option<User> {
        self.subscribe().borrow().user.clone()
    }

    /// Load any previously stored session. Clears `loading` when done.
    async fn restore(&self) -> Result<Option<User>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AuthError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Sending half of the auth signal, shared by provider implementations.
#[derive(Debug)]
pub struct AuthSignal {
    tx: watch::Sender<AuthState>,
}

impl AuthSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::loading());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn set(&self, state: AuthState) {
        self.tx.send_replace(state);
    }

    pub fn signed_in(&self, user: User) {
        self.set(AuthState::signed_in(user));
    }

    pub fn signed_out(&self) {
        self.set(AuthState::signed_out());
    }

    /// Clear `loading` without touching the user.
    pub fn loaded(&self) {
        self.tx.send_modify(|state| state.loading = false);
    }
}

impl Default for AuthSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        let mut user = User {
            id: "1".into(),
            email: "river@example.com".into(),
            full_name: None,
        };
        assert_eq!(user.display_name(), "river");
        user.full_name = Some("River Song".into());
        assert_eq!(user.display_name(), "River Song");
    }

    #[test]
    fn signal_starts_loading_and_publishes_updates() {
        let signal = AuthSignal::new();
        let rx = signal.subscribe();
        assert!(rx.borrow().loading);
        signal.loaded();
        assert_eq!(*rx.borrow(), AuthState::signed_out());
    }

    #[test]
    fn session_expiry() {
        let session = AuthSession {
            access_token: "t".into(),
            refresh_token: None,
            expires_at: Some(100),
            user: User {
                id: "1".into(),
                email: "a@b.c".into(),
                full_name: None,
            },
        };
        assert!(!session.is_expired(99));
        assert!(session.is_expired(100));
    }
}
