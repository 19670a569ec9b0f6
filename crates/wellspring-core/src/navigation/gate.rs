//! Session gate.
//!
//! Decides what the application shell shows based on the auth provider's
//! `{loading, user}` signal:
//!
//! ```text
//! loading            -> Screen::Loading
//! !loading, no user  -> Screen::SignedOut(auth form)
//! user present       -> Screen::Active(router.current())
//! ```
//!
//! The gate reads the latest value of a `watch` channel on every call, so a
//! sign-in becomes visible on the very next render. It never retries
//! anything itself.

use tokio::sync::watch;

use super::view::{Router, View};
use crate::auth::{AuthState, User};
use crate::error::AuthError;

/// Which authentication form is shown while signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
    ForgotPassword,
    /// Reset requested; confirmation panel for the given address.
    ResetLinkSent { email: String },
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome Back",
            AuthMode::SignUp => "Create Account",
            AuthMode::ForgotPassword => "Reset Password",
            AuthMode::ResetLinkSent { .. } => "Check Your Email",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign in to continue your wellness journey",
            AuthMode::SignUp => "Start your path to better mental wellness",
            AuthMode::ForgotPassword => "We'll send you a reset link",
            AuthMode::ResetLinkSent { .. } => "We've sent a password reset link",
        }
    }
}

/// What the shell renders right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    SignedOut(AuthMode),
    Active(View),
}

#[derive(Debug, Clone)]
pub struct SessionGate {
    auth: watch::Receiver<AuthState>,
    mode: AuthMode,
}

impl SessionGate {
    pub fn new(auth: watch::Receiver<AuthState>) -> Self {
        Self {
            auth,
            mode: AuthMode::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AuthState {
        self.auth.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.auth.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.auth.borrow().loading
    }

    /// Whether the router is reachable.
    pub fn is_open(&self) -> bool {
        let state = self.auth.borrow();
        !state.loading && state.user.is_some()
    }

    pub fn screen(&self, router: &Router) -> Screen {
        let state = self.auth.borrow();
        if state.loading {
            Screen::Loading
        } else if state.user.is_none() {
            Screen::SignedOut(self.mode.clone())
        } else {
            Screen::Active(router.current())
        }
    }

    /// # Errors
    /// [`AuthError::NotSignedIn`] unless a user is present.
    pub fn ensure_open(&self) -> Result<(), AuthError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(AuthError::NotSignedIn)
        }
    }

    pub fn mode(&self) -> &AuthMode {
        &self.mode
    }

    /// Wait until the provider publishes a new auth state.
    ///
    /// Returns `false` once the provider has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.auth.changed().await.is_ok()
    }

    // ── Auth form switching ──────────────────────────────────────────

    pub fn show_login(&mut self) {
        self.mode = AuthMode::Login;
    }

    pub fn show_sign_up(&mut self) {
        self.mode = AuthMode::SignUp;
    }

    pub fn show_forgot_password(&mut self) {
        self.mode = AuthMode::ForgotPassword;
    }

    pub fn show_reset_link_sent(&mut self, email: impl Into<String>) {
        self.mode = AuthMode::ResetLinkSent {
            email: email.into(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "sam@example.com".into(),
            full_name: Some("Sam".into()),
        }
    }

    #[test]
    fn loading_hides_everything() {
        let (_tx, rx) = watch::channel(AuthState::loading());
        let gate = SessionGate::new(rx);
        assert_eq!(gate.screen(&Router::new()), Screen::Loading);
        assert!(gate.ensure_open().is_err());
    }

    #[test]
    fn signed_out_shows_auth_form_and_keeps_router_state() {
        let (tx, rx) = watch::channel(AuthState::signed_in(user()));
        let gate = SessionGate::new(rx);
        let mut router = Router::new();
        router.navigate(View::Journal);

        tx.send_replace(AuthState::signed_out());
        assert_eq!(gate.screen(&router), Screen::SignedOut(AuthMode::Login));
        assert_eq!(router.current(), View::Journal);
    }

    #[test]
    fn sign_in_opens_router_immediately() {
        let (tx, rx) = watch::channel(AuthState::signed_out());
        let gate = SessionGate::new(rx);
        let router = Router::new();
        assert!(!gate.is_open());

        tx.send_replace(AuthState::signed_in(user()));
        assert_eq!(gate.screen(&router), Screen::Active(View::Dashboard));
        assert_eq!(gate.user().map(|u| u.email), Some("sam@example.com".into()));
    }

    #[test]
    fn auth_form_modes_switch_locally() {
        let (_tx, rx) = watch::channel(AuthState::signed_out());
        let mut gate = SessionGate::new(rx);
        gate.show_sign_up();
        assert_eq!(gate.mode().title(), "Create Account");
        gate.show_forgot_password();
        gate.show_reset_link_sent("sam@example.com");
        assert_eq!(gate.mode().title(), "Check Your Email");
        gate.show_login();
        assert_eq!(gate.mode(), &AuthMode::Login);
    }
}
