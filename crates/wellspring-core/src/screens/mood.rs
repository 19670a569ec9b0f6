//! Mood tracker: pick one of six moods, optionally add a note, log it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Amazing,
    Happy,
    Okay,
    Stressed,
    Anxious,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Amazing,
        Mood::Happy,
        Mood::Okay,
        Mood::Stressed,
        Mood::Anxious,
        Mood::Sad,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Mood::Amazing => "amazing",
            Mood::Happy => "happy",
            Mood::Okay => "okay",
            Mood::Stressed => "stressed",
            Mood::Anxious => "anxious",
            Mood::Sad => "sad",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Amazing => "🌟",
            Mood::Happy => "😊",
            Mood::Okay => "😐",
            Mood::Stressed => "😰",
            Mood::Anxious => "😟",
            Mood::Sad => "😢",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Amazing => "Amazing",
            Mood::Happy => "Happy",
            Mood::Okay => "Okay",
            Mood::Stressed => "Stressed",
            Mood::Anxious => "Anxious",
            Mood::Sad => "Sad",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.id() == wanted)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "mood".into(),
                message: format!("unknown mood '{s}'"),
            })
    }
}

/// A logged mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct MoodTracker {
    selected: Option<Mood>,
    note: String,
    history: Vec<MoodEntry>,
}

impl MoodTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Mood> {
        self.selected
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Logged moods, newest first.
    pub fn history(&self) -> &[MoodEntry] {
        &self.history
    }

    pub fn select(&mut self, mood: Mood) {
        self.selected = Some(mood);
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Record the selected mood and clear the form.
    ///
    /// # Errors
    /// [`ValidationError::NoMoodSelected`] if nothing is selected; the form
    /// is left untouched.
    pub fn log(&mut self, now: DateTime<Utc>) -> Result<MoodEntry, ValidationError> {
        let mood = self.selected.ok_or(ValidationError::NoMoodSelected)?;
        let note = self.note.trim();
        let entry = MoodEntry {
            mood,
            note: (!note.is_empty()).then(|| note.to_string()),
            logged_at: now,
        };
        self.history.insert(0, entry.clone());
        self.selected = None;
        self.note.clear();
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_without_selection_keeps_note() {
        let mut tracker = MoodTracker::new();
        tracker.set_note("long day");
        assert_eq!(
            tracker.log(Utc::now()).unwrap_err(),
            ValidationError::NoMoodSelected
        );
        assert_eq!(tracker.note(), "long day");
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn log_records_and_resets_form() {
        let mut tracker = MoodTracker::new();
        tracker.select(Mood::Stressed);
        tracker.set_note("  exams  ");
        let entry = tracker.log(Utc::now()).unwrap();
        assert_eq!(entry.mood, Mood::Stressed);
        assert_eq!(entry.note.as_deref(), Some("exams"));
        assert_eq!(tracker.selected(), None);
        assert_eq!(tracker.note(), "");

        tracker.select(Mood::Happy);
        tracker.log(Utc::now()).unwrap();
        assert_eq!(tracker.history()[0].mood, Mood::Happy);
        assert_eq!(tracker.history()[0].note, None);
        assert_eq!(tracker.history().len(), 2);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("Anxious".parse::<Mood>().unwrap(), Mood::Anxious);
        assert!("grumpy".parse::<Mood>().is_err());
        assert_eq!(Mood::Amazing.to_string(), "🌟 Amazing");
    }
}
