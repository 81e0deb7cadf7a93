//! One-shot timers polled once per tick
//!
//! Each pending timer is a `(deadline, action)` pair. An action acts as its
//! own key: scheduling an action that is already pending replaces the old
//! deadline, so at most one of each action is ever queued.

/// Deferred gameplay actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimedAction {
    /// Restore the default fire rate after a power-up window
    PowerDown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimerEntry {
    deadline: f64,
    action: TimedAction,
}

/// Keyed queue of pending one-shot timers
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` at `deadline`, replacing any pending instance of it
    pub fn schedule(&mut self, deadline: f64, action: TimedAction) {
        self.cancel(action);
        self.entries.push(TimerEntry { deadline, action });
    }

    /// Drop a pending action; returns whether one was queued
    pub fn cancel(&mut self, action: TimedAction) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.action != action);
        self.entries.len() != before
    }

    /// Deadline of a pending action
    pub fn deadline(&self, action: TimedAction) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.action == action)
            .map(|e| e.deadline)
    }

    /// Remove and return every action due at `now`, earliest first
    pub fn pop_due(&mut self, now: f64) -> Vec<TimedAction> {
        let mut due: Vec<TimerEntry> = Vec::new();
        self.entries.retain(|e| {
            if e.deadline <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.deadline.total_cmp(&b.deadline));
        due.into_iter().map(|e| e.action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
