//! Delayed-effect scheduling.
//!
//! The engine's only temporal behavior is "run effect E after duration D,
//! unless cancelled first". The scheduler is poll-based to preserve the
//! single-threaded run-to-completion model: the host calls
//! [`MonotonicScheduler::poll_due`] once per frame with the current time
//! and executes whatever came due. Deadlines are computed from a caller-
//! supplied `now` so tests can drive time through a manual clock.

use chrono::{DateTime, Duration, Utc};

/// Opaque handle identifying one scheduled effect.
///
/// Handles are never reused within a scheduler's lifetime, so cancelling
/// a stale handle after its effect already fired (or was replaced) is a
/// harmless no-op rather than a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

#[derive(Debug)]
struct Entry<E> {
    handle: ScheduleHandle,
    due_at: DateTime<Utc>,
    effect: E,
}

/// A cancel-safe delayed-effect queue ordered by deadline.
#[derive(Debug)]
pub struct MonotonicScheduler<E> {
    entries: Vec<Entry<E>>,
    next_handle: u64,
}

impl<E> MonotonicScheduler<E> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 0,
        }
    }

    /// Schedules `effect` to come due at `now + delay`.
    pub fn schedule_after(
        &mut self,
        now: DateTime<Utc>,
        delay: Duration,
        effect: E,
    ) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            due_at: now + delay,
            effect,
        });
        handle
    }

    /// Cancels a pending effect. Returns `true` if the effect was still
    /// pending, `false` if it already fired or was cancelled before.
    pub fn cancel(&mut self, handle: ScheduleHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Cancels every pending effect. Called on session reset so nothing
    /// scheduled before the reset can execute after it.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns every effect due at or before `now`, ordered
    /// by deadline (scheduling order breaks ties).
    pub fn poll_due(&mut self, now: DateTime<Utc>) -> Vec<E> {
        let mut due: Vec<Entry<E>> = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].due_at <= now {
                due.push(self.entries.remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|entry| (entry.due_at, entry.handle.0));
        due.into_iter().map(|entry| entry.effect).collect()
    }

    /// Number of effects still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

impl<E> Default for MonotonicScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
