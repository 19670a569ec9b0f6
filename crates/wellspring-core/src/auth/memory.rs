//! Local accounts kept in memory.
//!
//! Used when no auth backend is configured and as the test double for the
//! app root. Error messages mirror what the hosted backend returns.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::info;

use super::traits::{AuthProvider, AuthSignal, AuthState, SignUpOutcome, User};
use crate::error::AuthError;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: User,
}

#[derive(Debug, Default)]
pub struct MemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    signal: AuthSignal,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register an account.
    pub fn with_account(self, email: &str, password: &str, full_name: &str) -> Self {
        if let Ok(mut accounts) = self.accounts.lock() {
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.to_string(),
                full_name: Some(full_name.to_string()),
            };
            accounts.insert(
                email.to_ascii_lowercase(),
                Account {
                    password: password.to_string(),
                    user,
                },
            );
        }
        self
    }

    /// Make every subsequent call fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of provider operations invoked so far (restore excluded).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable("connection refused".into()));
        }
        Ok(())
    }

    fn rejected(message: &str) -> AuthError {
        AuthError::Rejected {
            status: Some(400),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.signal.subscribe()
    }

    async fn restore(&self) -> Result<Option<User>, AuthError> {
        self.signal.loaded();
        Ok(self.current_user())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.enter()?;
        let user = {
            let accounts = self
                .accounts
                .lock()
                .map_err(|e| AuthError::Unavailable(e.to_string()))?;
            match accounts.get(&email.to_ascii_lowercase()) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(Self::rejected("Invalid login credentials")),
            }
        };
        info!(email, "signed in (local)");
        self.signal.signed_in(user.clone());
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        self.enter()?;
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        let key = email.to_ascii_lowercase();
        if accounts.contains_key(&key) {
            return Err(Self::rejected("User already registered"));
        }
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: Some(display_name.to_string()),
        };
        accounts.insert(
            key,
            Account {
                password: password.to_string(),
                user,
            },
        );
        info!(email, "account created (local)");
        Ok(SignUpOutcome::ConfirmationRequired)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.enter()?;
        // Like the hosted backend, unknown addresses are not disclosed.
        info!(email, "password reset requested (local)");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.enter()?;
        self.signal.signed_out();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let provider = MemoryAuthProvider::new();
        provider.restore().await.unwrap();
        let outcome = provider.sign_up("a@b.c", "secret1", "Ann").await.unwrap();
        assert_eq!(outcome, SignUpOutcome::ConfirmationRequired);
        assert!(provider.current_user().is_none());

        let user = provider.sign_in("A@B.C", "secret1").await.unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Ann"));
        assert_eq!(provider.current_user(), Some(user));
    }

    #[tokio::test]
    async fn wrong_password_rejected_verbatim() {
        let provider = MemoryAuthProvider::new().with_account("a@b.c", "secret1", "Ann");
        let err = provider.sign_in("a@b.c", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn duplicate_sign_up_rejected() {
        let provider = MemoryAuthProvider::new().with_account("a@b.c", "secret1", "Ann");
        let err = provider.sign_up("a@b.c", "secret2", "Ann").await.unwrap_err();
        assert_eq!(err.to_string(), "User already registered");
    }

    #[tokio::test]
    async fn unavailable_backend_fails_every_call() {
        let provider = MemoryAuthProvider::new().with_account("a@b.c", "secret1", "Ann");
        provider.set_unavailable(true);
        assert!(matches!(
            provider.sign_in("a@b.c", "secret1").await,
            Err(AuthError::Unavailable(_))
        ));
        assert_eq!(provider.calls(), 1);
    }
}
