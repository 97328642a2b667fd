//! Deferred one-shot timers
//!
//! Every deferred effect is registered here and gets a generational handle.
//! Timers fire only when the owner pumps the registry with the current clock,
//! so nothing can run against state that has already been torn down.
//! Cancelling a handle that already fired (or was already cancelled) is a no-op.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerHandle;
}

#[derive(Debug, Clone)]
struct Entry<E> {
    due_ms: f64,
    /// Registration order, breaks ties between equal due times
    seq: u64,
    event: E,
}

/// Registry of pending timers carrying payload `E`
#[derive(Debug, Clone)]
pub struct TimerRegistry<E> {
    timers: SlotMap<TimerHandle, Entry<E>>,
    next_seq: u64,
}

impl<E> Default for TimerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerRegistry<E> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Register `event` to fire once the clock reaches `due_ms`
    pub fn schedule(&mut self, due_ms: f64, event: E) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Entry { due_ms, seq, event })
    }

    /// Cancel a pending timer. Returns false if it was no longer pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(handle).is_some()
    }

    /// Cancel everything still pending, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest due time among pending timers
    pub fn next_due(&self) -> Option<f64> {
        self.timers
            .values()
            .map(|e| e.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    ///
    /// Returns `(handle, due_ms, event)`. Call repeatedly until `None`;
    /// timers scheduled while draining are picked up in the same pass.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerHandle, f64, E)> {
        let handle = self
            .timers
            .iter()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(h, _)| h)?;
        let entry = self.timers.remove(handle)?;
        Some((handle, entry.due_ms, entry.event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut reg = TimerRegistry::new();
        reg.schedule(300.0, 'c');
        reg.schedule(100.0, 'a');
        reg.schedule(200.0, 'b');

        let mut fired = Vec::new();
        while let Some((_, _, e)) = reg.pop_due(1000.0) {
            fired.push(e);
        }
        assert_eq!(fired, vec!['a', 'b', 'c']);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_ties_fire_in_registration_order() {
        let mut reg = TimerRegistry::new();
        reg.schedule(50.0, 1);
        reg.schedule(50.0, 2);
        reg.schedule(50.0, 3);
        let fired: Vec<i32> = std::iter::from_fn(|| reg.pop_due(50.0).map(|(_, _, e)| e)).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut reg = TimerRegistry::new();
        let h = reg.schedule(500.0, ());
        assert!(reg.pop_due(499.9).is_none());
        assert!(reg.is_pending(h));
        assert_eq!(reg.next_due(), Some(500.0));
        assert!(reg.pop_due(500.0).is_some());
        assert!(!reg.is_pending(h));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut reg = TimerRegistry::new();
        let h = reg.schedule(10.0, ());
        assert!(reg.cancel(h));
        assert!(!reg.cancel(h));
        assert!(reg.pop_due(100.0).is_none());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut reg = TimerRegistry::new();
        let h = reg.schedule(10.0, ());
        let other = reg.schedule(20.0, ());
        assert!(reg.pop_due(15.0).is_some());
        assert!(!reg.cancel(h));
        assert!(reg.is_pending(other));
    }

    #[test]
    fn test_cancel_all() {
        let mut reg = TimerRegistry::new();
        for i in 0..5 {
            reg.schedule(i as f64, i);
        }
        assert_eq!(reg.cancel_all(), 5);
        assert!(reg.pop_due(f64::MAX).is_none());
        assert_eq!(reg.cancel_all(), 0);
    }
}
