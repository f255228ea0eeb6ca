//! Cancelable delayed tasks.
//!
//! The controller never sleeps. It asks a [`Scheduler`] to run a
//! [`TimerTask`] after a delay and keeps the returned handle; a task that
//! fires with a handle the controller no longer holds is ignored. Hosts drive
//! time forward through [`Scheduler::pop_due`].

use crate::view::ElementId;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub u64);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Hover lasted long enough on this element.
    Hesitation(ElementId),
    /// Assistance on this element timed out.
    AutoRestore(ElementId),
    /// Short delay after a click on, or a departure from, the element.
    DeferredRestore(ElementId),
    /// No pointer activity for a while.
    Inactivity,
}

pub trait Scheduler {
    fn now_ms(&self) -> u64;

    fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> TaskHandle;

    /// Returns false if the handle already fired or was never issued.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    fn pending(&self) -> usize;

    /// Removes and returns the earliest task due at or before `until_ms`,
    /// advancing the clock to its due time.
    fn pop_due(&mut self, until_ms: u64) -> Option<(TaskHandle, TimerTask)>;

    /// Moves the clock forward. Never moves it back.
    fn set_now(&mut self, now_ms: u64);
}

/// Deterministic scheduler with a manually advanced clock.
///
/// Tasks due at the same instant run in the order they were scheduled.
#[derive(Debug, Default, Clone)]
pub struct VirtualClock {
    now_ms: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), TimerTask>,
    index: BTreeMap<u64, u64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }

    /// Due time of the next queued task, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.index.contains_key(&handle.0)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TimerTask> {
        self.queue.values()
    }
}

impl Scheduler for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, seq), task);
        self.index.insert(seq, due);
        TaskHandle(seq)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.index.remove(&handle.0) {
            Some(due) => self.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn pop_due(&mut self, until_ms: u64) -> Option<(TaskHandle, TimerTask)> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until_ms {
            return None;
        }
        let task = self.queue.remove(&(due, seq))?;
        self.index.remove(&seq);
        self.now_ms = self.now_ms.max(due);
        Some((TaskHandle(seq), task))
    }

    fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut clock = VirtualClock::new();
        let late = clock.schedule(300, TimerTask::Inactivity);
        let early = clock.schedule(100, TimerTask::Hesitation(ElementId(1)));
        let same = clock.schedule(100, TimerTask::AutoRestore(ElementId(1)));

        assert_eq!(clock.pop_due(50), None);
        assert_eq!(clock.pop_due(1000), Some((early, TimerTask::Hesitation(ElementId(1)))));
        assert_eq!(clock.now_ms(), 100);
        assert_eq!(clock.pop_due(1000), Some((same, TimerTask::AutoRestore(ElementId(1)))));
        assert_eq!(clock.pop_due(1000), Some((late, TimerTask::Inactivity)));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut clock = VirtualClock::starting_at(1_000);
        let h = clock.schedule(10, TimerTask::Inactivity);
        assert!(clock.is_scheduled(h));
        assert!(clock.cancel(h));
        assert!(!clock.cancel(h));
        assert_eq!(clock.pop_due(u64::MAX), None);
        assert!(!clock.cancel(TaskHandle(42)));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = VirtualClock::starting_at(500);
        clock.set_now(200);
        assert_eq!(clock.now_ms(), 500);
        clock.set_now(900);
        assert_eq!(clock.now_ms(), 900);
        assert_eq!(clock.next_due(), None);
    }
}
