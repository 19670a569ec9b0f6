//! One-shot deadline timer.
//!
//! An [`Alarm`] is owned by exactly one state machine. It holds at most one
//! deadline; firing disarms it, so the owner must decide its next state and
//! re-arm explicitly before the alarm can fire again. This keeps ticks of one
//! timer strictly serialized.
//!
//! Like the rest of the timer code it never reads the clock itself: callers
//! pass `now_ms` (milliseconds on any monotonic scale) into every method.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alarm {
    deadline_ms: Option<u64>,
}

impl Alarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `duration_ms` after `from_ms`, replacing any pending deadline.
    ///
    /// Re-arming from the previous deadline rather than from "now" is what
    /// keeps periodic owners free of cumulative drift.
    pub fn arm(&mut self, from_ms: u64, duration_ms: u64) {
        self.deadline_ms = Some(from_ms.saturating_add(duration_ms));
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Milliseconds until the deadline, zero if already due.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms.map(|d| d.saturating_sub(now_ms))
    }

    /// Fire if due. Returns the deadline that elapsed and disarms.
    pub fn poll(&mut self, now_ms: u64) -> Option<u64> {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                Some(deadline)
            }
            _ => None,
        }
    }
}

/// Earliest of several optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<u64>>) -> Option<u64> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_then_disarms() {
        let mut alarm = Alarm::new();
        alarm.arm(1_000, 500);
        assert_eq!(alarm.poll(1_499), None);
        assert_eq!(alarm.poll(1_500), Some(1_500));
        assert!(!alarm.is_armed());
        assert_eq!(alarm.poll(5_000), None);
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut alarm = Alarm::new();
        alarm.arm(0, 100);
        assert!(alarm.cancel());
        assert!(!alarm.cancel());
        assert_eq!(alarm.poll(1_000), None);
    }

    #[test]
    fn rearm_replaces_pending_deadline() {
        let mut alarm = Alarm::new();
        alarm.arm(0, 100);
        alarm.arm(0, 300);
        assert_eq!(alarm.poll(100), None);
        assert_eq!(alarm.remaining_ms(200), Some(100));
        assert_eq!(alarm.poll(300), Some(300));
    }

    #[test]
    fn earliest_skips_disarmed() {
        assert_eq!(earliest([None, Some(40), Some(10)]), Some(10));
        assert_eq!(earliest([None, None]), None);
    }
}
