use std::cell::RefCell;
use std::time::Duration;

/// Deferred execution on the page's single event thread.
pub trait Scheduler {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// Scheduler driven by hand against a virtual clock. Tasks run in order of
/// due time, ties broken by scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    timeline: RefCell<Timeline>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.timeline.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.timeline.borrow().pending.len()
    }

    /// Runs the earliest pending task, moving the clock to its due time.
    /// Returns `false` if nothing was pending.
    pub fn run_next(&self) -> bool {
        let task = {
            let mut timeline = self.timeline.borrow_mut();
            let Some(index) = earliest(&timeline.pending) else {
                return false;
            };
            let pending = timeline.pending.swap_remove(index);
            timeline.now = timeline.now.max(pending.due);
            pending.task
        };
        task();
        true
    }

    /// Runs tasks until none are left. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Moves the clock forward by `by`, running every task that falls due.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now() + by;
        let mut ran = 0;
        loop {
            let next_due = {
                let timeline = self.timeline.borrow();
                earliest(&timeline.pending).map(|i| timeline.pending[i].due)
            };
            match next_due {
                Some(due) if due <= deadline => {
                    self.run_next();
                    ran += 1;
                }
                _ => break,
            }
        }
        self.timeline.borrow_mut().now = deadline;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let mut timeline = self.timeline.borrow_mut();
        let due = timeline.now + delay;
        let seq = timeline.next_seq;
        timeline.next_seq += 1;
        timeline.pending.push(Pending { due, seq, task });
    }
}

fn earliest(pending: &[Pending]) -> Option<usize> {
    pending
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| (p.due, p.seq))
        .map(|(i, _)| i)
}
