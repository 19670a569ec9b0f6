//! Meditation countdown.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running <-> Paused
//!             |
//!             +-> (remaining hits 0) -> Ready, remaining = total
//! ```
//!
//! The countdown decrements once per elapsed second. Pausing keeps the
//! progress already made into the current second, so a pause/resume pair
//! neither loses nor gains time.

use tracing::debug;

use super::alarm::Alarm;
use crate::error::ValidationError;
use crate::events::Event;

const SECOND_MS: u64 = 1_000;

/// Duration choices offered by the meditation screen, in seconds.
pub const MEDITATION_PRESETS_SECS: [u32; 6] = [180, 300, 600, 900, 1200, 1800];

pub const DEFAULT_MEDITATION_SECS: u32 = 300;

#[derive(Debug, Clone)]
pub struct MeditationTimer {
    total_secs: u32,
    remaining_secs: u32,
    running: bool,
    alarm: Alarm,
    /// Milliseconds already spent in the current second when paused.
    carry_ms: u64,
    completions: u64,
}

impl Default for MeditationTimer {
    fn default() -> Self {
        Self::ready(DEFAULT_MEDITATION_SECS)
    }
}

impl MeditationTimer {
    /// Create a countdown of `total_secs`.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDuration`] for zero.
    pub fn new(total_secs: u32) -> Result<Self, ValidationError> {
        if total_secs == 0 {
            return Err(ValidationError::InvalidDuration { secs: total_secs });
        }
        Ok(Self::ready(total_secs))
    }

    fn ready(total_secs: u32) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            running: false,
            alarm: Alarm::new(),
            carry_ms: 0,
            completions: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stopped with the full duration left and no partial second carried.
    pub fn is_idle(&self) -> bool {
        !self.running && self.remaining_secs == self.total_secs && self.carry_ms == 0
    }

    /// Number of countdowns that ran to zero.
    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.alarm.deadline_ms()
    }

    /// 0.0 .. 1.0 progress through the current countdown.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    pub fn status_text(&self) -> &'static str {
        if self.running {
            "Meditating..."
        } else {
            "Ready to meditate"
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Choose a new total. Only allowed while stopped.
    ///
    /// # Errors
    /// [`ValidationError::TimerRunning`] while running,
    /// [`ValidationError::InvalidDuration`] for zero.
    pub fn configure(&mut self, total_secs: u32) -> Result<Event, ValidationError> {
        if self.running {
            return Err(ValidationError::TimerRunning);
        }
        if total_secs == 0 {
            return Err(ValidationError::InvalidDuration { secs: total_secs });
        }
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
        self.carry_ms = 0;
        Ok(Event::MeditationConfigured { total_secs })
    }

    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        let until_next = SECOND_MS - self.carry_ms.min(SECOND_MS - 1);
        self.alarm.arm(now_ms, until_next);
        self.carry_ms = 0;
        debug!(remaining_secs = self.remaining_secs, "meditation started");
        Some(Event::MeditationStarted {
            remaining_secs: self.remaining_secs,
            at_ms: now_ms,
        })
    }

    /// Pause, first flushing any seconds that elapsed before `now_ms`.
    ///
    /// The returned events may therefore include ticks and even a completion.
    pub fn pause(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.tick(now_ms);
        if !self.running {
            return events;
        }
        let until_next = self.alarm.remaining_ms(now_ms).unwrap_or(SECOND_MS);
        self.carry_ms = SECOND_MS.saturating_sub(until_next);
        self.alarm.cancel();
        self.running = false;
        debug!(
            remaining_secs = self.remaining_secs,
            carry_ms = self.carry_ms,
            "meditation paused"
        );
        events.push(Event::MeditationPaused {
            remaining_secs: self.remaining_secs,
            at_ms: now_ms,
        });
        events
    }

    /// Start/pause control.
    pub fn toggle(&mut self, now_ms: u64) -> Vec<Event> {
        if self.running {
            self.pause(now_ms)
        } else {
            self.start(now_ms).into_iter().collect()
        }
    }

    /// Stop and refill. Never counts as a completion.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.alarm.cancel();
        self.remaining_secs = self.total_secs;
        self.carry_ms = 0;
        Event::MeditationReset {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Consume every whole second that has elapsed by `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while self.running {
            let Some(elapsed_at) = self.alarm.poll(now_ms) else {
                break;
            };
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                self.running = false;
                self.remaining_secs = self.total_secs;
                self.completions += 1;
                debug!(total_secs = self.total_secs, "meditation completed");
                events.push(Event::MeditationCompleted {
                    total_secs: self.total_secs,
                    at_ms: elapsed_at,
                });
                break;
            }
            self.alarm.arm(elapsed_at, SECOND_MS);
            events.push(Event::MeditationTick {
                remaining_secs: self.remaining_secs,
                at_ms: elapsed_at,
            });
        }
        events
    }
}

/// Render seconds as `m:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Render a preset as a button label, e.g. `5 min`.
pub fn preset_label(secs: u32) -> String {
    format!("{} min", secs / 60)
}
