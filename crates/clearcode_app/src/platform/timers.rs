use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use clearcode_engine::Scheduler;
use tokio::sync::Notify;

/// Real-time scheduler for a current-thread runtime. Tasks are spawned onto
/// the surrounding `LocalSet`, so `after` must be called from inside it.
#[derive(Default)]
pub struct LocalTimers {
    outstanding: Rc<Cell<usize>>,
    settled: Rc<Notify>,
}

impl LocalTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves once no scheduled task is left, including tasks scheduled
    /// by other tasks.
    pub async fn idle(&self) {
        while self.outstanding.get() > 0 {
            self.settled.notified().await;
        }
    }
}

impl Scheduler for LocalTimers {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let outstanding = Rc::clone(&self.outstanding);
        let settled = Rc::clone(&self.settled);
        outstanding.set(outstanding.get() + 1);
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
            outstanding.set(outstanding.get() - 1);
            settled.notify_one();
        });
    }
}
