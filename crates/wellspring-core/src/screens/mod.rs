pub mod dashboard;
pub mod journal;
pub mod mood;
pub mod relax;

pub use dashboard::{Dashboard, QuickAction, Quote, QUICK_ACTIONS, QUOTES};
pub use journal::{time_ago, Journal, JournalEntry};
pub use mood::{Mood, MoodEntry, MoodTracker};
pub use relax::{Panel, RelaxationTools};
