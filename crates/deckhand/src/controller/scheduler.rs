use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// A deferred one-shot action owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Commit the transition with the given id.
    CommitTransition(u64),
    /// Spawn the n-th confetti particle of a celebration.
    SpawnParticle(usize),
    /// Remove the particle with the given id once its animation is over.
    RemoveParticle(u64),
    /// Start fading out the onboarding hint.
    FadeHint,
    /// Remove the onboarding hint entirely.
    RemoveHint,
    /// Clear the keyboard navigating cue.
    EndNavigatingCue,
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Single-threaded queue of one-shot tasks on a monotonic clock.
///
/// Time is measured as a `Duration` since the presentation started. Tasks
/// that share a due time run in the order they were scheduled. Nothing is
/// ever cancelled: once scheduled, a task runs when its time comes.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run `delay` after `now`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: Task) {
        self.schedule_at(now + delay, task);
    }

    pub fn schedule_at(&mut self, due: Duration, task: Task) {
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(Reverse(Entry { due, seq, task }));
    }

    /// Pop the earliest task if it is due at `now`, returning its due time.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, Task)> {
        let due = self.queue.peek()?.0.due;
        if due > now {
            return None;
        }
        self.queue.pop().map(|Reverse(e)| (e.due, e.task))
    }

    /// Earliest pending due time.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(e)| e.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending tasks in execution order.
    pub fn pending(&self) -> Vec<(Duration, Task)> {
        let mut entries: Vec<&Entry> = self.queue.iter().map(|Reverse(e)| e).collect();
        entries.sort();
        entries.into_iter().map(|e| (e.due, e.task)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_runs_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(0), ms(300), Task::RemoveHint);
        s.schedule(ms(0), ms(100), Task::FadeHint);
        assert_eq!(s.next_deadline(), Some(ms(100)));
        assert_eq!(s.pop_due(ms(1000)), Some((ms(100), Task::FadeHint)));
        assert_eq!(s.pop_due(ms(1000)), Some((ms(300), Task::RemoveHint)));
        assert!(s.is_empty());
    }

    #[test]
    fn test_not_due_yet() {
        let mut s = Scheduler::new();
        s.schedule(ms(50), ms(600), Task::CommitTransition(0));
        assert_eq!(s.pop_due(ms(649)), None);
        assert_eq!(s.len(), 1);
        assert_eq!(
            s.pop_due(ms(650)),
            Some((ms(650), Task::CommitTransition(0)))
        );
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_at(ms(10), Task::SpawnParticle(2));
        s.schedule_at(ms(10), Task::SpawnParticle(0));
        s.schedule_at(ms(10), Task::SpawnParticle(1));
        let order: Vec<Task> = std::iter::from_fn(|| s.pop_due(ms(10)).map(|(_, t)| t)).collect();
        assert_eq!(
            order,
            vec![
                Task::SpawnParticle(2),
                Task::SpawnParticle(0),
                Task::SpawnParticle(1)
            ]
        );
    }

    #[test]
    fn test_pending_is_sorted() {
        let mut s = Scheduler::new();
        s.schedule_at(ms(30), Task::EndNavigatingCue);
        s.schedule_at(ms(10), Task::FadeHint);
        s.schedule_at(ms(20), Task::RemoveHint);
        let due: Vec<Duration> = s.pending().into_iter().map(|(d, _)| d).collect();
        assert_eq!(due, vec![ms(10), ms(20), ms(30)]);
    }
}
