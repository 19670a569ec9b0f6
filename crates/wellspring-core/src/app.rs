//! Application root.
//!
//! [`App`] owns every piece of state: the auth provider handle, the session
//! gate, the router, each screen and the notifier. Hosts create one at
//! start-up, feed it user actions and clock ticks, and drop it at shutdown.
//!
//! Every action follows the same shape: validate, act, then report. Failures
//! become a destructive notification and are returned to the host; state is
//! left exactly as it was before the action.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{
    AuthProvider, PasswordResetForm, SignInForm, SignUpForm, SignUpOutcome, User,
};
use crate::error::{AuthError, CoreError, Result, ValidationError};
use crate::events::Event;
use crate::navigation::{SessionGate, Router, Screen, View};
use crate::notify::{Notification, Notifier, QuietNotifier};
use crate::screens::{Dashboard, Journal, MoodTracker, Panel, RelaxationTools};
use crate::storage::Config;
use crate::timer::earliest;

const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

pub struct App {
    auth: Arc<dyn AuthProvider>,
    gate: SessionGate,
    router: Router,
    dashboard: Dashboard,
    mood: MoodTracker,
    journal: Journal,
    relax: RelaxationTools,
    notifier: Box<dyn Notifier>,
    min_password_length: usize,
    presets_secs: Vec<u32>,
}

impl App {
    /// # Errors
    /// Returns an error if the configured meditation length is zero.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        notifier: Box<dyn Notifier>,
        config: &Config,
    ) -> Result<Self> {
        let notifier: Box<dyn Notifier> = if config.notifications.enabled {
            notifier
        } else {
            Box::new(QuietNotifier::new(notifier))
        };
        let interval_ms = config.dashboard.quote_interval_secs.saturating_mul(1_000);
        Ok(Self {
            gate: SessionGate::new(auth.subscribe()),
            auth,
            router: Router::new(),
            dashboard: Dashboard::new(interval_ms),
            mood: MoodTracker::new(),
            journal: Journal::new(),
            relax: RelaxationTools::new(config.meditation.default_duration_secs)?,
            notifier,
            min_password_length: config.auth.min_password_length,
            presets_secs: config.meditation.presets_secs.clone(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        self.gate.screen(&self.router)
    }

    pub fn user(&self) -> Option<User> {
        self.gate.user()
    }

    pub fn provider_name(&self) -> &str {
        self.auth.name()
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// Auth form switching (login, sign-up, forgot password).
    pub fn gate_mut(&mut self) -> &mut SessionGate {
        &mut self.gate
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn mood(&self) -> &MoodTracker {
        &self.mood
    }

    /// Mood form editing. Refused while signed out, leaving the form as it was.
    pub fn mood_mut(&mut self) -> Result<&mut MoodTracker> {
        self.require_signed_in()?;
        Ok(&mut self.mood)
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Journal draft editing. Refused while signed out.
    pub fn journal_mut(&mut self) -> Result<&mut Journal> {
        self.require_signed_in()?;
        Ok(&mut self.journal)
    }

    pub fn relax(&self) -> &RelaxationTools {
        &self.relax
    }

    pub fn meditation_presets(&self) -> &[u32] {
        &self.presets_secs
    }

    /// Earliest pending timer deadline, for hosts that sleep between ticks.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        earliest([self.dashboard.next_deadline_ms(), self.relax.next_deadline_ms()])
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Load a previously stored session. Clears the loading screen.
    pub async fn restore(&mut self) -> Result<Option<User>> {
        let result = self.auth.restore().await;
        match result {
            Ok(user) => {
                debug!(signed_in = user.is_some(), "session restored");
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "session restore failed");
                self.fail("Session Error", UNEXPECTED, e)
            }
        }
    }

    pub async fn sign_in(&mut self, form: &SignInForm) -> Result<Event> {
        let credentials = match form.validate() {
            Ok(c) => c,
            Err(e) => return self.fail("Missing Information", "Please fill in all fields.", e),
        };
        let result = self
            .auth
            .sign_in(&credentials.email, &credentials.password)
            .await;
        match result {
            Ok(user) => {
                self.gate.show_login();
                self.notify(Notification::info(
                    "Welcome back!",
                    "You've successfully signed in.",
                ));
                Ok(Event::SignedIn {
                    email: user.email,
                    at: Utc::now(),
                })
            }
            Err(e @ AuthError::Rejected { .. }) => {
                let message = e.to_string();
                self.fail("Login Failed", &message, e)
            }
            Err(e) => self.fail("Login Error", UNEXPECTED, e),
        }
    }

    /// Validation runs completely before the provider is contacted.
    pub async fn sign_up(&mut self, form: &SignUpForm) -> Result<SignUpOutcome> {
        let request = match form.validate(self.min_password_length) {
            Ok(r) => r,
            Err(e @ ValidationError::PasswordMismatch) => {
                return self.fail("Password Mismatch", "Passwords do not match.", e)
            }
            Err(e @ ValidationError::WeakPassword { .. }) => {
                let message = format!("{e}.");
                return self.fail("Weak Password", &message, e);
            }
            Err(e) => return self.fail("Missing Information", "Please fill in all fields.", e),
        };
        let result = self
            .auth
            .sign_up(&request.email, &request.password, &request.full_name)
            .await;
        match result {
            Ok(outcome) => {
                let description = match outcome {
                    SignUpOutcome::ConfirmationRequired => {
                        self.gate.show_login();
                        "Please check your email to confirm your account."
                    }
                    SignUpOutcome::SignedIn(_) => "Welcome! You're signed in.",
                };
                self.notify(Notification::info("Account Created!", description));
                Ok(outcome)
            }
            Err(e @ AuthError::Rejected { .. }) => {
                let message = e.to_string();
                self.fail("Sign Up Failed", &message, e)
            }
            Err(e) => self.fail("Sign Up Error", UNEXPECTED, e),
        }
    }

    pub async fn request_password_reset(&mut self, form: &PasswordResetForm) -> Result<()> {
        let email = match form.validate() {
            Ok(email) => email,
            Err(e) => return self.fail("Email Required", "Please enter your email address.", e),
        };
        let result = self.auth.request_password_reset(&email).await;
        match result {
            Ok(()) => {
                self.notify(Notification::info(
                    "Reset Email Sent",
                    "Check your email for the password reset link.",
                ));
                self.gate.show_reset_link_sent(email);
                Ok(())
            }
            Err(e @ AuthError::Rejected { .. }) => {
                let message = e.to_string();
                self.fail("Reset Failed", &message, e)
            }
            Err(e) => self.fail("Reset Error", UNEXPECTED, e),
        }
    }

    pub async fn sign_out(&mut self) -> Result<Event> {
        let result = self.auth.sign_out().await;
        match result {
            Ok(()) => {
                self.relax.teardown();
                self.dashboard.stop_rotation();
                self.gate.show_login();
                self.notify(Notification::info(
                    "Logged Out",
                    "You've been successfully logged out.",
                ));
                Ok(Event::SignedOut { at: Utc::now() })
            }
            Err(e @ AuthError::Rejected { .. }) => {
                let message = e.to_string();
                self.fail("Logout Error", &message, e)
            }
            Err(e) => self.fail("Logout Error", "An unexpected error occurred.", e),
        }
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Switch screens. Refused while signed out; the router keeps its view.
    pub fn navigate(&mut self, target: View, now_ms: u64) -> Result<Vec<Event>> {
        self.require_signed_in()?;
        let transition = self.router.navigate(target);
        let mut events = Vec::new();
        if transition.left(View::Relax) {
            events.extend(self.relax.teardown());
        }
        if transition.left(View::Dashboard) {
            self.dashboard.stop_rotation();
        }
        if self.router.current() == View::Dashboard {
            self.dashboard.start_rotation(now_ms);
        }
        if transition.changed() {
            events.push(Event::ViewChanged {
                from: transition.from,
                to: transition.to,
            });
        }
        Ok(events)
    }

    pub fn back(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        self.navigate(View::Dashboard, now_ms)
    }

    // ── Mood & journal ───────────────────────────────────────────────

    pub fn log_mood(&mut self, now: DateTime<Utc>) -> Result<Event> {
        self.require_signed_in()?;
        match self.mood.log(now) {
            Ok(entry) => {
                self.notify(Notification::info(
                    "Mood logged successfully! 💙",
                    "Your mood has been recorded. Keep taking care of yourself!",
                ));
                Ok(Event::MoodLogged {
                    mood: entry.mood,
                    at: entry.logged_at,
                })
            }
            Err(e) => self.fail(
                "Please select a mood",
                "Choose how you're feeling today before saving.",
                e,
            ),
        }
    }

    pub fn save_journal_entry(&mut self, now: DateTime<Utc>) -> Result<Event> {
        self.require_signed_in()?;
        match self.journal.save(now) {
            Ok(entry) => {
                self.notify(Notification::info(
                    "Journal entry saved! 📝",
                    "Your thoughts have been safely recorded.",
                ));
                Ok(Event::JournalEntrySaved {
                    id: entry.id,
                    at: entry.created_at,
                })
            }
            Err(e) => self.fail(
                "Entry is empty",
                "Please write something in your journal entry.",
                e,
            ),
        }
    }

    // ── Relaxation tools ─────────────────────────────────────────────

    pub fn open_panel(&mut self, panel: Panel) -> Result<()> {
        self.require_relax()?;
        self.relax.open(panel);
        Ok(())
    }

    pub fn close_panel(&mut self) -> Result<()> {
        self.require_relax()?;
        self.relax.close_panel();
        Ok(())
    }

    pub fn toggle_breathing(&mut self, now_ms: u64) -> Result<Event> {
        self.require_relax()?;
        Ok(self.relax.breathing_mut().toggle(now_ms))
    }

    pub fn reset_breathing(&mut self) -> Result<Event> {
        self.require_relax()?;
        Ok(self.relax.breathing_mut().reset())
    }

    pub fn configure_meditation(&mut self, total_secs: u32) -> Result<Event> {
        self.require_relax()?;
        match self.relax.meditation_mut().configure(total_secs) {
            Ok(event) => Ok(event),
            Err(e) => {
                let message = e.to_string();
                self.fail("Invalid Duration", &message, e)
            }
        }
    }

    pub fn toggle_meditation(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        self.require_relax()?;
        let events = self.relax.meditation_mut().toggle(now_ms);
        self.announce(&events);
        Ok(events)
    }

    pub fn reset_meditation(&mut self) -> Result<Event> {
        self.require_relax()?;
        Ok(self.relax.meditation_mut().reset())
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Fire every timer that is due by `now_ms`.
    ///
    /// Also reconciles timers with the auth signal: a session that ended
    /// since the last tick tears the relaxation timers down, and the quote
    /// carousel runs only while the dashboard is actually visible.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        if !self.gate.is_open() {
            self.dashboard.stop_rotation();
            return self.relax.teardown();
        }
        let mut events = Vec::new();
        if self.router.current() == View::Dashboard {
            self.dashboard.start_rotation(now_ms);
            events.extend(self.dashboard.tick(now_ms));
        } else {
            self.dashboard.stop_rotation();
        }
        events.extend(self.relax.tick(now_ms));
        self.announce(&events);
        events
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    fn announce(&self, events: &[Event]) {
        for event in events {
            if let Event::MeditationCompleted { .. } = event {
                self.notify(Notification::info(
                    "Meditation Complete! 🧘‍♀️",
                    "Great job taking time for yourself. How do you feel?",
                ));
            }
        }
    }

    fn fail<T>(&self, title: &str, description: &str, err: impl Into<CoreError>) -> Result<T> {
        let err = err.into();
        debug!(kind = ?err.kind(), error = %err, "action failed");
        self.notify(Notification::destructive(title, description));
        Err(err)
    }

    fn require_signed_in(&self) -> Result<()> {
        match self.gate.ensure_open() {
            Ok(()) => Ok(()),
            Err(e) => self.fail("Not Signed In", "Please sign in to continue.", e),
        }
    }

    fn require_relax(&self) -> Result<()> {
        self.require_signed_in()?;
        if self.router.current() == View::Relax {
            return Ok(());
        }
        self.fail(
            "Relaxation Tools Closed",
            "Open the relaxation tools first.",
            ValidationError::InvalidValue {
                field: "view".into(),
                message: format!("relaxation tools are not open (on {})", self.router.current()),
            },
        )
    }
}
