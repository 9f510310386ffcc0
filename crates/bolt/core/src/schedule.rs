//! Region-local timer queue.
//!
//! Actions are keyed by `(fire_at, TimerId)` so that [`Scheduler::run_due`]
//! always fires the earliest action first and breaks ties by insertion order.
//! Actions fire one at a time on the caller's thread; two actions of the same
//! scheduler never overlap.

use std::collections::BTreeMap;

use crate::state::Tick;

/// Identifier handed out by [`Scheduler::start`], increasing per scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId(pub u64);

/// Action fired by a [`Scheduler`].
pub trait TimedAction<C: ?Sized> {
    /// Runs the action at `now`.
    ///
    /// Returns `0` to finish, or `n > 0` to fire again `n` ticks later.
    fn on_tick(&mut self, now: Tick, ctx: &mut C) -> u32;
}

/// Ordered queue of delayed actions.
#[derive(Debug)]
pub struct Scheduler<A> {
    queue: BTreeMap<(Tick, TimerId), A>,
    next_id: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Schedules `action` to fire `delay` ticks after `now`.
    ///
    /// A zero delay fires on the next tick, never within the current one.
    pub fn start(&mut self, now: Tick, delay: u64, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((now + delay.max(1), id), action);
        id
    }

    /// Number of actions waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Fire tick of the earliest pending action.
    pub fn next_due(&self) -> Option<Tick> {
        self.queue.keys().next().map(|(tick, _)| *tick)
    }

    /// Fires every action due at or before `now`, in `(fire_at, TimerId)`
    /// order, and returns how many ran.
    ///
    /// Actions asking to fire again are re-queued at `now + n` under their
    /// original id, so they never run twice within one call.
    pub fn run_due<C>(&mut self, now: Tick, ctx: &mut C) -> usize
    where
        A: TimedAction<C>,
        C: ?Sized,
    {
        let mut fired = 0;
        let mut requeue = Vec::new();

        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let ((_, id), mut action) = entry.remove_entry();
            fired += 1;

            let again = action.on_tick(now, ctx);
            if again > 0 {
                requeue.push((now + u64::from(again), id, action));
            }
        }

        for (at, id, action) in requeue {
            self.queue.insert((at, id), action);
        }

        fired
    }
}
