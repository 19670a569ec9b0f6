mod alarm;
mod breathing;
mod meditation;

pub use alarm::{earliest, Alarm};
pub use breathing::{BreathingExercise, BreathingPhase};
pub use meditation::{
    format_clock, preset_label, MeditationTimer, DEFAULT_MEDITATION_SECS, MEDITATION_PRESETS_SECS,
};
