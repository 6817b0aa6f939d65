use std::rc::Rc;

use tokio::task::spawn_local;

use promis_core::{Scheduler, Task};

/// Scheduler backed by `tokio::task::spawn_local`.
///
/// Each task becomes its own local tokio task, so it runs on a later poll of
/// the `LocalSet`, never inside `schedule`. Scheduling outside a `LocalSet`
/// panics, as `spawn_local` does.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScheduler;

impl LocalScheduler {
    #[must_use]
    pub fn handle(self) -> Rc<dyn Scheduler> {
        Rc::new(self)
    }
}

impl Scheduler for LocalScheduler {
    fn schedule(&self, task: Task) {
        drop(spawn_local(async move { task() }));
    }
}
