//! Countdown timers for "wait, then act" sequences
//!
//! Timers hold a remaining duration and are advanced only by the owning
//! controller's `update`. Pausing the controller therefore freezes its
//! timers exactly. Clearing the set on exit drops every pending action, so
//! nothing scheduled by a phase can fire after that phase is gone.

/// Identifies a scheduled timer for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<E> {
    handle: TimerHandle,
    remaining: f32,
    event: E,
}

#[derive(Debug, Clone)]
pub struct TimerSet<E> {
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for TimerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerSet<E> {
    pub fn new() -> Self {
        Self { next_id: 0, pending: Vec::new() }
    }

    /// Fire `event` once `delay` seconds of update time have passed.
    pub fn schedule(&mut self, delay: f32, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { handle, remaining: delay.max(0.0), event });
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.pending.iter().find(|p| p.handle == handle).map(|p| p.remaining)
    }

    /// Count every timer down by `dt` and return the events that elapsed,
    /// earliest deadline first (ties in scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        let dt = dt.max(0.0);
        for p in &mut self.pending {
            p.remaining -= dt;
        }

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].remaining <= 0.0 {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| {
            a.remaining
                .partial_cmp(&b.remaining)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.handle.0.cmp(&b.handle.0))
        });
        due.into_iter().map(|p| p.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_after_delay() {
        let mut timers = TimerSet::new();
        timers.schedule(1.0, "ring");

        assert!(timers.advance(0.4).is_empty());
        assert!(timers.advance(0.4).is_empty());
        assert_eq!(timers.advance(0.4), vec!["ring"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut timers = TimerSet::new();
        timers.schedule(0.0, 1);
        assert_eq!(timers.advance(0.0), vec![1]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerSet::new();
        let a = timers.schedule(0.5, 'a');
        timers.schedule(0.5, 'b');

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.advance(1.0), vec!['b']);
    }

    #[test]
    fn due_events_come_out_earliest_first() {
        let mut timers = TimerSet::new();
        timers.schedule(0.9, "late");
        timers.schedule(0.2, "early");
        timers.schedule(0.2, "early-second");

        assert_eq!(timers.advance(1.0), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut timers = TimerSet::new();
        let h = timers.schedule(3.0, ());
        timers.schedule(4.0, ());
        timers.advance(1.0);
        assert_eq!(timers.remaining(h), Some(2.0));

        timers.clear();
        assert!(timers.is_empty());
        assert!(timers.advance(10.0).is_empty());
    }
}
