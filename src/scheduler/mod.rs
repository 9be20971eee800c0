//! Deferred callbacks on a virtual clock.
//!
//! Lookup retries are scheduled here instead of sleeping. The embedding
//! loop advances the queue (by wall time, or by hand in tests) and hands
//! every fired [`TimerId`] back to whoever scheduled it.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Handle to a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Shared flag tying scheduled work to the lifetime of its owner.
///
/// Clones share the flag. Once cancelled, every timer carrying the token is
/// discarded instead of firing.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    /// Create a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token and all work tied to it.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Whether [`CancellationToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Something that can run a callback after a delay.
pub trait Scheduler {
    /// Schedule a timer `delay` from now, tied to `token`.
    fn schedule(&mut self, delay: Duration, token: &CancellationToken) -> TimerId;

    /// Drop a pending timer. Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Timer queue with its own monotonic clock.
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), CancellationToken>,
}

impl TimerQueue {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the queue's clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return the timers that came due.
    ///
    /// Timers whose token was cancelled are dropped silently.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;

        // Everything strictly after `now` stays queued.
        let first_future = (self.now + Duration::from_nanos(1), TimerId(0));
        let still_pending = self.pending.split_off(&first_future);
        let due = std::mem::replace(&mut self.pending, still_pending);

        due.into_iter()
            .filter(|(_, token)| !token.is_cancelled())
            .map(|((_, id), _)| id)
            .collect()
    }

    /// Time until the earliest live timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .find(|(_, token)| !token.is_cancelled())
            .map(|((deadline, _), _)| deadline.saturating_sub(self.now))
    }

    /// Number of live timers still waiting.
    pub fn pending_len(&self) -> usize {
        self.pending
            .values()
            .filter(|token| !token.is_cancelled())
            .count()
    }

    /// True if no live timer is waiting.
    pub fn is_idle(&self) -> bool {
        self.pending_len() == 0
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, token: &CancellationToken) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay, id), token.clone());
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|(_, pending_id), _| *pending_id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn timer_fires_only_once_due() {
        let mut queue = TimerQueue::new();
        let token = CancellationToken::new();
        let id = queue.schedule(100 * MS, &token);

        assert!(queue.advance(99 * MS).is_empty());
        assert_eq!(queue.advance(MS), vec![id]);
        assert!(queue.advance(1000 * MS).is_empty(), "fires once");
    }

    #[test]
    fn timers_fire_in_deadline_then_schedule_order() {
        let mut queue = TimerQueue::new();
        let token = CancellationToken::new();
        let late = queue.schedule(50 * MS, &token);
        let first = queue.schedule(10 * MS, &token);
        let second = queue.schedule(10 * MS, &token);

        assert_eq!(queue.advance(100 * MS), vec![first, second, late]);
    }

    #[test]
    fn cancelled_token_discards_timer() {
        let mut queue = TimerQueue::new();
        let token = CancellationToken::new();
        queue.schedule(10 * MS, &token);
        token.cancel();

        assert!(queue.is_idle());
        assert_eq!(queue.next_deadline(), None);
        assert!(queue.advance(10 * MS).is_empty());
    }

    #[test]
    fn cancel_by_id_removes_only_that_timer() {
        let mut queue = TimerQueue::new();
        let token = CancellationToken::new();
        let a = queue.schedule(10 * MS, &token);
        let b = queue.schedule(10 * MS, &token);
        queue.cancel(a);

        assert_eq!(queue.pending_len(), 1);
        assert_eq!(queue.advance(10 * MS), vec![b]);
    }

    #[test]
    fn next_deadline_is_relative_to_now() {
        let mut queue = TimerQueue::new();
        let token = CancellationToken::new();
        queue.schedule(100 * MS, &token);
        queue.advance(30 * MS);

        assert_eq!(queue.next_deadline(), Some(70 * MS));
        assert_eq!(queue.now(), 30 * MS);
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
