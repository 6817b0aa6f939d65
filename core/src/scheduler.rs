//! Deferred execution of promise work.
//!
//! The promise machinery never runs a handler in the synchronous step that
//! registered it or that settled its upstream. Every such unit of work goes
//! through a [`Scheduler`]; this module defines that seam plus a
//! deterministic FIFO implementation for embedders and tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

use promis_types::FlushBudget;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Runs a task after the current synchronous execution unwinds.
///
/// Implementations must not run `task` from inside `schedule`.
pub trait Scheduler {
    fn schedule(&self, task: Task);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlushError {
    #[error("microtask flush stopped after {executed} tasks without going idle")]
    BudgetExhausted { executed: usize },
}

#[derive(Default)]
struct MicrotaskState {
    tasks: RefCell<VecDeque<Task>>,
    budget: FlushBudget,
}

/// Deterministic single-threaded task queue.
///
/// Tasks run strictly in the order they were scheduled, and only when the
/// embedder calls [`run_next`](Self::run_next) or
/// [`run_until_idle`](Self::run_until_idle).
#[derive(Clone, Default)]
pub struct MicrotaskQueue {
    state: Rc<MicrotaskState>,
}

impl MicrotaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_budget(budget: FlushBudget) -> Self {
        Self {
            state: Rc::new(MicrotaskState {
                tasks: RefCell::default(),
                budget,
            }),
        }
    }

    /// Scheduler handle to hand to promises.
    ///
    /// The handle holds the queue weakly, so promises parked in the queue do not
    /// keep it alive. Tasks scheduled after the queue is dropped are discarded.
    #[must_use]
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::new(MicrotaskHandle(Rc::downgrade(&self.state)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.tasks.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.tasks.borrow().is_empty()
    }

    #[must_use]
    pub fn budget(&self) -> FlushBudget {
        self.state.budget
    }

    /// Run the oldest task, if any. One call is one turn.
    pub fn run_next(&self) -> bool {
        let task = self.state.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks, including ones scheduled along the way, until the queue is
    /// empty or the flush budget is spent.
    pub fn run_until_idle(&self) -> Result<usize, FlushError> {
        let budget = self.state.budget.get();
        let mut executed = 0;
        while executed < budget {
            if !self.run_next() {
                return Ok(executed);
            }
            executed += 1;
        }
        if self.is_empty() {
            return Ok(executed);
        }
        tracing::warn!(
            executed,
            remaining = self.len(),
            "Microtask flush budget exhausted"
        );
        Err(FlushError::BudgetExhausted { executed })
    }
}

impl fmt::Debug for MicrotaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrotaskQueue")
            .field("pending", &self.len())
            .field("budget", &self.state.budget.get())
            .finish()
    }
}

struct MicrotaskHandle(Weak<MicrotaskState>);

impl Scheduler for MicrotaskHandle {
    fn schedule(&self, task: Task) {
        match self.0.upgrade() {
            Some(state) => state.tasks.borrow_mut().push_back(task),
            None => tracing::debug!("Microtask queue dropped; discarding task"),
        }
    }
}
