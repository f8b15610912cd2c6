//! Delayed tasks tied to an epoch
//!
//! The game never sleeps. Anything that should happen "later" (the enemy's
//! thinking pause, a stunned turn auto-skip, a dialog opening after a walk)
//! is queued here with the epoch that was current when it was scheduled.
//! Bumping the epoch makes every older task stale: it is dropped instead of
//! firing.

use std::time::Duration;

/// Identity of the context a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// The following epoch
    pub fn next(self) -> Epoch {
        Epoch(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Handle for cancelling a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TaskId,
    epoch: Epoch,
    due_at: Duration,
    task: T,
}

/// Single-threaded timer queue advanced by [`Scheduler::tick`]
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    now: Duration,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            pending: Vec::new(),
            now: Duration::ZERO,
            next_id: 0,
        }
    }
}

impl<T: std::fmt::Debug> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task to fire after `delay`
    pub fn schedule(&mut self, epoch: Epoch, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            epoch,
            due_at: self.now + delay,
            task,
        });
        id
    }

    /// Cancel one task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel every task of an epoch, returning how many were removed
    pub fn cancel_epoch(&mut self, epoch: Epoch) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.epoch != epoch);
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance the clock and collect due tasks of `current`
    ///
    /// Due tasks from other epochs are dropped. Tasks come back in due order,
    /// ties in scheduling order.
    pub fn tick(&mut self, elapsed: Duration, current: Epoch) -> Vec<T> {
        self.now += elapsed;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_at <= now);
        self.pending = waiting;
        due.sort_by_key(|p| (p.due_at, p.id.0));

        due.into_iter()
            .filter_map(|p| {
                if p.epoch == current {
                    tracing::debug!(task = ?p.task, "scheduled task fired");
                    Some(p.task)
                } else {
                    tracing::debug!(task = ?p.task, epoch = p.epoch.value(), "stale task dropped");
                    None
                }
            })
            .collect()
    }
}
