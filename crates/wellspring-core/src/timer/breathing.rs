//! Guided 4-2-6-1 breathing exercise.
//!
//! ## Phase Cycle
//!
//! ```text
//! Inhale (4s) -> Hold (2s) -> Exhale (6s) -> Pause (1s) -> Inhale ...
//! ```
//!
//! The exercise is tick-driven like the meditation countdown: the caller
//! invokes `tick(now_ms)` whenever the alarm deadline may have passed. Each
//! firing advances exactly one phase and re-arms from the elapsed deadline,
//! so a late tick catches up phase by phase instead of skipping.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::alarm::Alarm;
use crate::events::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingPhase {
    #[default]
    Inhale,
    Hold,
    Exhale,
    Pause,
}

impl BreathingPhase {
    pub const ALL: [BreathingPhase; 4] = [
        BreathingPhase::Inhale,
        BreathingPhase::Hold,
        BreathingPhase::Exhale,
        BreathingPhase::Pause,
    ];

    pub fn duration_ms(self) -> u64 {
        match self {
            BreathingPhase::Inhale => 4_000,
            BreathingPhase::Hold => 2_000,
            BreathingPhase::Exhale => 6_000,
            BreathingPhase::Pause => 1_000,
        }
    }

    pub fn next(self) -> Self {
        match self {
            BreathingPhase::Inhale => BreathingPhase::Hold,
            BreathingPhase::Hold => BreathingPhase::Exhale,
            BreathingPhase::Exhale => BreathingPhase::Pause,
            BreathingPhase::Pause => BreathingPhase::Inhale,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            BreathingPhase::Inhale => "Breathe In...",
            BreathingPhase::Hold => "Hold...",
            BreathingPhase::Exhale => "Breathe Out...",
            BreathingPhase::Pause => "Pause...",
        }
    }

    /// Whether the breathing visual is drawn expanded (lungs full).
    pub fn is_expanded(self) -> bool {
        matches!(self, BreathingPhase::Inhale | BreathingPhase::Hold)
    }

    /// Length of one full cycle in milliseconds.
    pub fn cycle_ms() -> u64 {
        Self::ALL.iter().map(|p| p.duration_ms()).sum()
    }
}

impl std::fmt::Display for BreathingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BreathingPhase::Inhale => "inhale",
            BreathingPhase::Hold => "hold",
            BreathingPhase::Exhale => "exhale",
            BreathingPhase::Pause => "pause",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BreathingExercise {
    phase: BreathingPhase,
    running: bool,
    alarm: Alarm,
    cycles_completed: u64,
}

impl BreathingExercise {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> BreathingPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stopped at Inhale with no cycles counted, as after [`reset`](Self::reset).
    pub fn is_idle(&self) -> bool {
        !self.running && self.phase == BreathingPhase::Inhale && self.cycles_completed == 0
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.alarm.deadline_ms()
    }

    pub fn phase_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.alarm.remaining_ms(now_ms)
    }

    /// Text to show in the middle of the breathing visual.
    pub fn prompt(&self) -> &'static str {
        if self.running {
            self.phase.instruction()
        } else {
            "Ready to breathe?"
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin at Inhale. Restarts the cycle when already running.
    pub fn start(&mut self, now_ms: u64) -> Event {
        self.phase = BreathingPhase::Inhale;
        self.running = true;
        self.cycles_completed = 0;
        self.alarm.arm(now_ms, self.phase.duration_ms());
        debug!(now_ms, "breathing started");
        Event::BreathingStarted { at_ms: now_ms }
    }

    /// Halt advancement; the current phase stays visible.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        self.alarm.cancel();
        debug!(phase = %self.phase, "breathing stopped");
        Some(Event::BreathingStopped { phase: self.phase })
    }

    /// Start/stop control: stops when running, otherwise starts at Inhale.
    pub fn toggle(&mut self, now_ms: u64) -> Event {
        match self.stop() {
            Some(event) => event,
            None => self.start(now_ms),
        }
    }

    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.alarm.cancel();
        self.phase = BreathingPhase::Inhale;
        self.cycles_completed = 0;
        Event::BreathingReset
    }

    /// Advance through every phase boundary that has elapsed by `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }
        while let Some(elapsed_at) = self.alarm.poll(now_ms) {
            let from = self.phase;
            let to = from.next();
            self.phase = to;
            if to == BreathingPhase::Inhale {
                self.cycles_completed += 1;
            }
            self.alarm.arm(elapsed_at, to.duration_ms());
            events.push(Event::BreathingPhaseChanged {
                from,
                to,
                at_ms: elapsed_at,
            });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(events: &[Event]) -> Vec<BreathingPhase> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::BreathingPhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cycle_duration_is_13_seconds() {
        assert_eq!(BreathingPhase::cycle_ms(), 13_000);
    }

    #[test]
    fn advances_on_each_phase_boundary() {
        let mut ex = BreathingExercise::new();
        ex.start(0);
        assert!(ex.tick(3_999).is_empty());
        assert_eq!(phases(&ex.tick(4_000)), vec![BreathingPhase::Hold]);
        assert_eq!(phases(&ex.tick(6_000)), vec![BreathingPhase::Exhale]);
        assert_eq!(phases(&ex.tick(12_000)), vec![BreathingPhase::Pause]);
        assert_eq!(phases(&ex.tick(13_000)), vec![BreathingPhase::Inhale]);
        assert_eq!(ex.cycles_completed(), 1);
    }

    #[test]
    fn late_tick_catches_up_without_skipping() {
        let mut ex = BreathingExercise::new();
        ex.start(0);
        let seen = phases(&ex.tick(13_000));
        assert_eq!(
            seen,
            vec![
                BreathingPhase::Hold,
                BreathingPhase::Exhale,
                BreathingPhase::Pause,
                BreathingPhase::Inhale
            ]
        );
        // Next boundary is measured from 13s, not from when the tick ran.
        assert_eq!(ex.next_deadline_ms(), Some(17_000));
    }

    #[test]
    fn no_drift_over_many_cycles() {
        let mut ex = BreathingExercise::new();
        ex.start(500);
        let mut now = 500;
        // Tick irregularly, always a little late.
        while now < 500 + 100 * 13_000 {
            now += 777;
            ex.tick(now);
        }
        ex.tick(500 + 100 * 13_000);
        assert_eq!(ex.cycles_completed(), 100);
        assert_eq!(ex.phase(), BreathingPhase::Inhale);
        assert_eq!(ex.next_deadline_ms(), Some(500 + 100 * 13_000 + 4_000));
    }

    #[test]
    fn stop_freezes_phase_and_cancels_pending_tick() {
        let mut ex = BreathingExercise::new();
        ex.start(0);
        ex.tick(4_000);
        assert!(ex.stop().is_some());
        assert_eq!(ex.phase(), BreathingPhase::Hold);
        assert!(ex.tick(60_000).is_empty());
        assert_eq!(ex.phase(), BreathingPhase::Hold);
        assert_eq!(ex.next_deadline_ms(), None);
    }

    #[test]
    fn restart_begins_at_inhale_with_fresh_timer() {
        let mut ex = BreathingExercise::new();
        ex.start(0);
        ex.tick(4_000);
        ex.stop();
        ex.start(10_000);
        assert_eq!(ex.phase(), BreathingPhase::Inhale);
        // The old Hold deadline (6s) must not fire.
        assert!(ex.tick(13_999).is_empty());
        assert_eq!(phases(&ex.tick(14_000)), vec![BreathingPhase::Hold]);
    }

    #[test]
    fn reset_returns_to_inhale() {
        let mut ex = BreathingExercise::new();
        ex.start(0);
        ex.tick(6_000);
        ex.reset();
        assert_eq!(ex.phase(), BreathingPhase::Inhale);
        assert!(!ex.is_running());
        assert_eq!(ex.prompt(), "Ready to breathe?");
    }

    #[test]
    fn toggle_alternates_start_and_stop() {
        let mut ex = BreathingExercise::new();
        assert!(matches!(ex.toggle(0), Event::BreathingStarted { .. }));
        assert!(matches!(ex.toggle(10), Event::BreathingStopped { .. }));
        assert!(!ex.is_running());
    }
}
