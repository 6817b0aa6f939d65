use std::rc::Rc;

use promis_core::{MicrotaskQueue, Scheduler};
use promis_types::{RuntimeSettings, SchedulerKind};

use crate::LocalScheduler;

/// The scheduler chosen by [`RuntimeSettings`].
#[derive(Debug, Clone)]
pub enum RuntimeScheduler {
    Microtask(MicrotaskQueue),
    LocalSet(LocalScheduler),
}

impl RuntimeScheduler {
    /// Build the scheduler named by `settings`.
    ///
    /// With [`SchedulerKind::LocalSet`], every promise built on
    /// [`Self::scheduler`] must settle and register continuations inside a
    /// running `tokio::task::LocalSet`; doing so anywhere else panics in
    /// `spawn_local`.
    #[must_use]
    pub fn from_settings(settings: &RuntimeSettings) -> Self {
        tracing::debug!(
            scheduler = settings.scheduler().as_str(),
            flush_budget = settings.flush_budget().get(),
            "Selecting promise scheduler"
        );
        match settings.scheduler() {
            SchedulerKind::Microtask => {
                Self::Microtask(MicrotaskQueue::with_budget(settings.flush_budget()))
            }
            SchedulerKind::LocalSet => Self::LocalSet(LocalScheduler),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SchedulerKind {
        match self {
            Self::Microtask(_) => SchedulerKind::Microtask,
            Self::LocalSet(_) => SchedulerKind::LocalSet,
        }
    }

    /// Handle to pass to promise constructors.
    #[must_use]
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        match self {
            Self::Microtask(queue) => queue.scheduler(),
            Self::LocalSet(local) => local.handle(),
        }
    }

    /// The queue the embedder must flush, when microtask scheduling is active.
    #[must_use]
    pub fn microtasks(&self) -> Option<&MicrotaskQueue> {
        match self {
            Self::Microtask(queue) => Some(queue),
            Self::LocalSet(_) => None,
        }
    }
}
