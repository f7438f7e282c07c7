//! Virtual clock with an ordered timer queue.
//!
//! Widgets schedule their own transitions on a [`Timeline`] and drain it from
//! `advance`. Timers fire in due order, ties in scheduling order, and a timer
//! scheduled while draining fires in the same drain if it falls inside the
//! window.
//!
//! ```
//! use fortuna_core::Timeline;
//!
//! let mut timeline = Timeline::new();
//! timeline.schedule_in(300, "fade");
//! timeline.schedule_in(100, "flash");
//!
//! let target = timeline.now() + 1_000;
//! let mut fired = Vec::new();
//! while let Some(event) = timeline.pop_due(target) {
//!     fired.push((timeline.now(), event));
//! }
//! timeline.advance_to(target);
//!
//! assert_eq!(fired, vec![(100, "flash"), (300, "fade")]);
//! assert_eq!(timeline.now(), 1_000);
//! ```

use serde::{Deserialize, Serialize};

/// Milliseconds on a widget's virtual clock.
pub type Millis = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled<E> {
    due: Millis,
    seq: u64,
    event: E,
}

/// Ordered timer queue with its own notion of "now".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline<E> {
    now: Millis,
    next_seq: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    /// Create an empty timeline at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Millis {
        self.now
    }

    /// Schedule `event` at an absolute time. Times in the past fire on the next drain.
    pub fn schedule_at(&mut self, due: Millis, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = self
            .pending
            .partition_point(|s| (s.due, s.seq) <= (due, seq));
        self.pending.insert(idx, Scheduled { due, seq, event });
    }

    /// Schedule `event` `delay` milliseconds from now.
    pub fn schedule_in(&mut self, delay: Millis, event: E) {
        self.schedule_at(self.now.saturating_add(delay), event);
    }

    /// Remove and return the earliest timer due at or before `limit`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, limit: Millis) -> Option<E> {
        if self.pending.first().is_some_and(|s| s.due <= limit) {
            let Scheduled { due, event, .. } = self.pending.remove(0);
            self.now = self.now.max(due);
            Some(event)
        } else {
            None
        }
    }

    /// Move the clock forward to `target` (never backwards).
    pub fn advance_to(&mut self, target: Millis) {
        self.now = self.now.max(target);
    }

    /// Due time of the next timer, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.first().map(|s| s.due)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop pending timers for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&E) -> bool) {
        self.pending.retain(|s| keep(&s.event));
    }

    /// Drop every pending timer.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}
