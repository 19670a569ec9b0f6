//! # Wellspring Core Library
//!
//! Core logic for the Wellspring wellness app: mood tracking, journaling,
//! guided breathing, meditation timers and account handling. Everything runs
//! through a single [`App`] root; hosts (the `wellspring` CLI) only forward
//! user input and clock ticks to it.
//!
//! ## Architecture
//!
//! - **Timers**: deterministic tick-driven state machines. Callers pass the
//!   current time into every method, so nothing here reads a clock
//! - **Navigation**: a view router behind a session gate that shows the
//!   auth flow until a user is signed in
//! - **Auth**: an async provider trait with a Supabase REST client and a
//!   local in-memory implementation
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`App`]: Application root
//! - [`BreathingExercise`] / [`MeditationTimer`]: Relaxation timers
//! - [`Router`] / [`SessionGate`]: Screen selection
//! - [`AuthProvider`]: Trait for authentication backends
//! - [`Config`]: Application configuration management

pub mod app;
pub mod auth;
pub mod error;
pub mod events;
pub mod navigation;
pub mod notify;
pub mod screens;
pub mod storage;
pub mod timer;

pub use app::App;
pub use auth::{AuthProvider, AuthState, MemoryAuthProvider, SupabaseAuth, User};
pub use error::{AuthError, ConfigError, CoreError, ErrorKind, ValidationError};
pub use events::Event;
pub use navigation::{AuthMode, Router, Screen, SessionGate, View};
pub use notify::{MemoryNotifier, Notification, Notifier, Severity};
pub use screens::{Journal, Mood, MoodTracker, Panel, RelaxationTools};
pub use storage::Config;
pub use timer::{Alarm, BreathingExercise, BreathingPhase, MeditationTimer};
