//! # Deferred Action Queue
//!
//! Schedules actions to run on a later simulation tick. Replaces the
//! "yield for two physics steps, then act" idiom with an explicit queue the
//! owner drains once per step.
//!
//! ## Lifecycle
//!
//! 1. **Pending**: scheduled, waiting for its due tick.
//! 2. **Due**: returned by [`DeferredQueue::drain_due()`] and removed.
//! 3. **Cancelled**: removed by [`DeferredQueue::cancel()`] or invalidated
//!    wholesale by [`DeferredQueue::invalidate_all()`].
//!
//! ## Cancellation
//!
//! Every handle carries the queue's generation at scheduling time.
//! `invalidate_all()` bumps the generation, so handles and entries from
//! before the bump can never fire, even if a stale handle is later passed
//! back. This is what keeps a pending constraint creation from firing
//! against an object that was removed from the simulation while it waited.

use serde::{Deserialize, Serialize};

use vrtk_core::Tick;

/// Handle to a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeferredHandle {
    id: u64,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Entry<A> {
    handle: DeferredHandle,
    due: Tick,
    action: A,
}

/// A tick-scheduled queue of actions.
#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    entries: Vec<Entry<A>>,
    next_id: u64,
    generation: u64,
}

impl<A> DeferredQueue<A> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            generation: 0,
        }
    }

    /// Schedule `action` to become due on tick `due`.
    pub fn schedule(&mut self, due: Tick, action: A) -> DeferredHandle {
        let handle = DeferredHandle {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due,
            action,
        });
        handle
    }

    /// Cancel one scheduled action.
    ///
    /// Returns the action if it was still pending, `None` if it already
    /// fired, was cancelled, or belongs to an invalidated generation.
    pub fn cancel(&mut self, handle: DeferredHandle) -> Option<A> {
        if handle.generation != self.generation {
            return None;
        }
        let index = self.entries.iter().position(|e| e.handle == handle)?;
        Some(self.entries.remove(index).action)
    }

    /// Drop every pending action and invalidate all outstanding handles.
    ///
    /// Returns the number of actions dropped.
    pub fn invalidate_all(&mut self) -> usize {
        self.generation += 1;
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Remove and return every action due at or before `now`, in
    /// scheduling order.
    pub fn drain_due(&mut self, now: Tick) -> Vec<A> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.due <= now {
                due.push(entry.action);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;
        due
    }

    /// Whether the handle still refers to a pending action.
    pub fn is_pending(&self, handle: DeferredHandle) -> bool {
        handle.generation == self.generation && self.entries.iter().any(|e| e.handle == handle)
    }


    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_become_due_on_their_tick() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Tick(3), "a");
        queue.schedule(Tick(5), "b");

        assert!(queue.drain_due(Tick(2)).is_empty());
        assert_eq!(queue.drain_due(Tick(3)), vec!["a"]);
        assert_eq!(queue.len(), 1);
        assert!(queue.drain_due(Tick(4)).is_empty());
        assert_eq!(queue.drain_due(Tick(9)), vec!["b"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overdue_actions_drain_in_scheduling_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Tick(4), 1);
        queue.schedule(Tick(2), 2);
        queue.schedule(Tick(3), 3);
        assert_eq!(queue.drain_due(Tick(10)), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel_pending_action() {
        let mut queue = DeferredQueue::new();
        let handle = queue.schedule(Tick(2), "lock");
        assert!(queue.is_pending(handle));
        assert_eq!(queue.cancel(handle), Some("lock"));
        assert!(!queue.is_pending(handle));
        assert_eq!(queue.cancel(handle), None);
        assert!(queue.drain_due(Tick(5)).is_empty());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut queue = DeferredQueue::new();
        let handle = queue.schedule(Tick(1), "lock");
        assert_eq!(queue.drain_due(Tick(1)), vec!["lock"]);
        assert_eq!(queue.cancel(handle), None);
    }

    #[test]
    fn test_invalidate_all_kills_stale_handles() {
        let mut queue = DeferredQueue::new();
        let stale = queue.schedule(Tick(2), "old");
        assert_eq!(queue.invalidate_all(), 1);
        assert!(queue.is_empty());

        let fresh = queue.schedule(Tick(2), "new");
        assert_ne!(stale, fresh);
        assert!(!queue.is_pending(stale));
        assert_eq!(queue.cancel(stale), None);
        assert!(queue.is_pending(fresh));
        assert_eq!(queue.drain_due(Tick(2)), vec!["new"]);
    }
}
