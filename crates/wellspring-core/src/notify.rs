//! User-visible notifications (toasts).
//!
//! Fire-and-forget: the core hands a [`Notification`] to a [`Notifier`] and
//! never looks at it again.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

pub trait Notifier: Send {
    fn notify(&self, notification: Notification);
}

/// Collects notifications in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything delivered so far.
    pub fn take(&self) -> Vec<Notification> {
        match self.inner.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn titles(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(guard) => guard.iter().map(|n| n.title.clone()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.push(notification);
        }
    }
}

/// Drops informational notifications, passing destructive ones through.
pub struct QuietNotifier<N> {
    inner: N,
}

impl<N: Notifier> QuietNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: Notifier> Notifier for QuietNotifier<N> {
    fn notify(&self, notification: Notification) {
        if notification.severity == Severity::Destructive {
            self.inner.notify(notification);
        }
    }
}

impl Notifier for Box<dyn Notifier> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_notifier_shares_buffer_between_clones() {
        let a = MemoryNotifier::new();
        let b = a.clone();
        a.notify(Notification::info("Hello", "there"));
        assert_eq!(b.titles(), vec!["Hello".to_string()]);
        assert_eq!(b.take().len(), 1);
        assert!(a.take().is_empty());
    }

    #[test]
    fn quiet_notifier_keeps_only_destructive() {
        let sink = MemoryNotifier::new();
        let quiet = QuietNotifier::new(sink.clone());
        quiet.notify(Notification::info("Saved", ""));
        quiet.notify(Notification::destructive("Login Failed", "bad"));
        assert_eq!(sink.titles(), vec!["Login Failed".to_string()]);
    }
}
