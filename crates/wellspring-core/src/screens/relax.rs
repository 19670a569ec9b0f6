//! Relaxation tools: a menu leading to the breathing exercise or the
//! meditation timer. Both timers live here and die with the screen.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;
use crate::timer::{earliest, BreathingExercise, MeditationTimer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Menu,
    Breathing,
    Meditation,
}

#[derive(Debug, Clone, Default)]
pub struct RelaxationTools {
    panel: Panel,
    breathing: BreathingExercise,
    meditation: MeditationTimer,
}

impl RelaxationTools {
    /// # Errors
    /// [`ValidationError::InvalidDuration`] for a zero default duration.
    pub fn new(default_meditation_secs: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            panel: Panel::Menu,
            breathing: BreathingExercise::new(),
            meditation: MeditationTimer::new(default_meditation_secs)?,
        })
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn breathing(&self) -> &BreathingExercise {
        &self.breathing
    }

    pub fn breathing_mut(&mut self) -> &mut BreathingExercise {
        &mut self.breathing
    }

    pub fn meditation(&self) -> &MeditationTimer {
        &self.meditation
    }

    pub fn meditation_mut(&mut self) -> &mut MeditationTimer {
        &mut self.meditation
    }

    /// Switch panels. Timers keep running; only [`teardown`](Self::teardown)
    /// stops them.
    pub fn open(&mut self, panel: Panel) {
        self.panel = panel;
    }

    /// Back to the menu.
    pub fn close_panel(&mut self) {
        self.panel = Panel::Menu;
    }

    /// Stop and rewind both timers and return to the menu. Called when the
    /// screen is left; the chosen meditation length survives.
    pub fn teardown(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.breathing.is_idle() {
            events.extend(self.breathing.stop());
            events.push(self.breathing.reset());
        }
        if !self.meditation.is_idle() {
            events.push(self.meditation.reset());
        }
        self.panel = Panel::Menu;
        events
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.breathing.tick(now_ms);
        events.extend(self.meditation.tick(now_ms));
        events
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        earliest([
            self.breathing.next_deadline_ms(),
            self.meditation.next_deadline_ms(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::BreathingPhase;

    #[test]
    fn teardown_stops_both_timers() {
        let mut tools = RelaxationTools::new(180).unwrap();
        tools.open(Panel::Breathing);
        tools.breathing_mut().start(0);
        tools.meditation_mut().start(0);
        let events = tools.teardown();
        assert_eq!(
            events,
            vec![
                Event::BreathingStopped {
                    phase: BreathingPhase::Inhale
                },
                Event::BreathingReset,
                Event::MeditationReset { remaining_secs: 180 },
            ]
        );
        assert!(!tools.breathing().is_running());
        assert!(!tools.meditation().is_running());
        assert_eq!(tools.meditation().remaining_secs(), 180);
        assert_eq!(tools.panel(), Panel::Menu);
        assert_eq!(tools.next_deadline_ms(), None);
    }

    #[test]
    fn teardown_rewinds_stopped_and_paused_timers() {
        let mut tools = RelaxationTools::new(300).unwrap();
        tools.breathing_mut().start(0);
        tools.breathing_mut().tick(7_000);
        tools.breathing_mut().stop();
        tools.meditation_mut().start(0);
        tools.meditation_mut().pause(10_400);
        assert_eq!(tools.meditation().remaining_secs(), 290);

        let events = tools.teardown();
        assert!(events.contains(&Event::BreathingReset));
        assert_eq!(tools.breathing().phase(), BreathingPhase::Inhale);
        assert_eq!(tools.meditation().remaining_secs(), 300);

        // Restarting counts a full second, not the 400 ms left over.
        tools.meditation_mut().start(20_000);
        assert_eq!(tools.next_deadline_ms(), Some(21_000));

        // Nothing left to tear down.
        tools.meditation_mut().reset();
        assert!(tools.teardown().is_empty());
    }

    #[test]
    fn next_deadline_is_earliest_of_both() {
        let mut tools = RelaxationTools::new(300).unwrap();
        tools.breathing_mut().start(0);
        tools.meditation_mut().start(0);
        assert_eq!(tools.next_deadline_ms(), Some(1_000));
        tools.tick(1_000);
        assert_eq!(tools.next_deadline_ms(), Some(2_000));
    }

    #[test]
    fn zero_default_rejected() {
        assert!(RelaxationTools::new(0).is_err());
    }
}
