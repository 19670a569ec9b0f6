//! Dashboard: quick actions and a rotating quote carousel.
//!
//! The carousel owns its own [`Alarm`] and only runs while the dashboard is
//! the active view; the app root starts and stops it on navigation.

use tracing::debug;

use crate::events::Event;
use crate::navigation::View;
use crate::timer::Alarm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: [Quote; 4] = [
    Quote {
        text: "You are braver than you believe, stronger than you seem, and smarter than you think.",
        author: "A.A. Milne",
    },
    Quote {
        text: "The only impossible journey is the one you never begin.",
        author: "Tony Robbins",
    },
    Quote {
        text: "Your mental health is a priority. Your happiness is essential. Your self-care is a necessity.",
        author: "Anonymous",
    },
    Quote {
        text: "Progress, not perfection. Every small step counts.",
        author: "Anonymous",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub target: View,
    pub title: &'static str,
    pub description: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        target: View::Mood,
        title: "Track Mood",
        description: "Log how you're feeling today",
    },
    QuickAction {
        target: View::Relax,
        title: "Relax & Breathe",
        description: "Find your calm with guided exercises",
    },
    QuickAction {
        target: View::Journal,
        title: "Journal",
        description: "Express your thoughts freely",
    },
];

#[derive(Debug, Clone)]
pub struct Dashboard {
    quote_index: usize,
    interval_ms: u64,
    alarm: Alarm,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl Dashboard {
    /// `interval_ms` is clamped to at least one millisecond.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            quote_index: 0,
            interval_ms: interval_ms.max(1),
            alarm: Alarm::new(),
        }
    }

    pub fn quote(&self) -> Quote {
        QUOTES[self.quote_index]
    }

    pub fn quote_index(&self) -> usize {
        self.quote_index
    }

    pub fn quick_actions(&self) -> &'static [QuickAction] {
        &QUICK_ACTIONS
    }

    pub fn is_rotating(&self) -> bool {
        self.alarm.is_armed()
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.alarm.deadline_ms()
    }

    /// Begin rotating. Does nothing if already rotating.
    pub fn start_rotation(&mut self, now_ms: u64) {
        if !self.alarm.is_armed() {
            self.alarm.arm(now_ms, self.interval_ms);
        }
    }

    pub fn stop_rotation(&mut self) {
        self.alarm.cancel();
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(fired_at) = self.alarm.poll(now_ms) {
            self.quote_index = (self.quote_index + 1) % QUOTES.len();
            self.alarm.arm(fired_at, self.interval_ms);
            debug!(index = self.quote_index, "quote rotated");
            events.push(Event::QuoteRotated {
                index: self.quote_index,
                at_ms: fired_at,
            });
        }
        events
    }
}
