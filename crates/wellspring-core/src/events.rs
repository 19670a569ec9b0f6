use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::navigation::View;
use crate::screens::Mood;
use crate::timer::BreathingPhase;

/// Every state change in the system produces an Event.
/// Hosts print or render them; the app root turns some into notifications.
///
/// Timer events carry `at_ms` on the caller's monotonic clock; user actions
/// carry wall-clock `at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    BreathingStarted {
        at_ms: u64,
    },
    BreathingPhaseChanged {
        from: BreathingPhase,
        to: BreathingPhase,
        at_ms: u64,
    },
    BreathingStopped {
        phase: BreathingPhase,
    },
    BreathingReset,
    MeditationConfigured {
        total_secs: u32,
    },
    MeditationStarted {
        remaining_secs: u32,
        at_ms: u64,
    },
    MeditationPaused {
        remaining_secs: u32,
        at_ms: u64,
    },
    MeditationTick {
        remaining_secs: u32,
        at_ms: u64,
    },
    MeditationCompleted {
        total_secs: u32,
        at_ms: u64,
    },
    MeditationReset {
        remaining_secs: u32,
    },
    QuoteRotated {
        index: usize,
        at_ms: u64,
    },
    ViewChanged {
        from: View,
        to: View,
    },
    JournalEntrySaved {
        id: String,
        at: DateTime<Utc>,
    },
    MoodLogged {
        mood: Mood,
        at: DateTime<Utc>,
    },
    SignedIn {
        email: String,
        at: DateTime<Utc>,
    },
    SignedOut {
        at: DateTime<Utc>,
    },
}
