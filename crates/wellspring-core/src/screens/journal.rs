//! Journal: free-text entries kept newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Journal {
    draft: String,
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Save the draft as a new entry and clear it.
    ///
    /// The entry's timestamp is never older than the current newest entry,
    /// even if the wall clock stepped backwards.
    ///
    /// # Errors
    /// [`ValidationError::EmptyJournalEntry`] for blank drafts; nothing is
    /// appended and the draft is kept.
    pub fn save(&mut self, now: DateTime<Utc>) -> Result<JournalEntry, ValidationError> {
        if self.draft.trim().is_empty() {
            return Err(ValidationError::EmptyJournalEntry);
        }
        let created_at = match self.entries.first() {
            Some(newest) if newest.created_at > now => newest.created_at,
            _ => now,
        };
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            content: std::mem::take(&mut self.draft),
            created_at,
        };
        debug!(id = %entry.id, "journal entry saved");
        self.entries.insert(0, entry.clone());
        Ok(entry)
    }

    /// Case-insensitive substring search over entry content.
    pub fn search(&self, query: &str) -> Vec<&JournalEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|e| e.content.to_lowercase().contains(&needle))
            .collect()
    }
}

/// "Today", "Yesterday" or "N days ago", counting whole 24h periods.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - then).num_days() {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d => format!("{d} days ago"),
    }
}
