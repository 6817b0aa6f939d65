//! The promise instance: construction, registration, settlement and drain.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use promis_types::{PromiseId, StateTag};

use crate::queue::{Continuation, ContinuationQueue, Handler};
use crate::resolve::{RejectFn, ResolveFn};
use crate::scheduler::{Scheduler, Task};
use crate::state::{Settled, State};
use crate::teardown;
use crate::value::Value;

struct Shared {
    id: PromiseId,
    scheduler: Rc<dyn Scheduler>,
    state: RefCell<State>,
    queue: RefCell<ContinuationQueue>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let queue = std::mem::take(self.queue.get_mut());
        let state = std::mem::take(self.state.get_mut());
        if queue.is_empty() && matches!(state, State::Pending) {
            return;
        }
        teardown::release((queue, state));
    }
}

/// An eventual value that settles exactly once.
///
/// Cloning yields another handle to the same instance. A pending instance
/// stays reachable through whoever can still settle it: an executor
/// capability, a [`Deferred`], or the continuation that will feed it.
#[derive(Clone)]
pub struct Promise {
    shared: Rc<Shared>,
}

/// A pending promise together with its external capabilities.
#[derive(Debug, Clone)]
pub struct Deferred {
    /// The pending promise.
    pub promise: Promise,
    /// Runs the resolution procedure on `promise`.
    pub resolve: ResolveFn,
    /// Rejects `promise` directly.
    pub reject: RejectFn,
}

impl Promise {
    fn pending(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            shared: Rc::new(Shared {
                id: PromiseId::next(),
                scheduler,
                state: RefCell::default(),
                queue: RefCell::default(),
            }),
        }
    }

    /// Create a promise and run `executor` synchronously with its capabilities.
    ///
    /// `resolve` runs the resolution procedure; `reject` settles directly.
    /// A panic inside `executor` is not converted into a rejection: it unwinds
    /// out of this call.
    pub fn new<F>(scheduler: Rc<dyn Scheduler>, executor: F) -> Self
    where
        F: FnOnce(ResolveFn, RejectFn),
    {
        let promise = Self::pending(scheduler);
        executor(
            ResolveFn::direct(promise.clone()),
            RejectFn::direct(promise.clone()),
        );
        promise
    }

    /// A promise resolved with `value`. Promises and thenables are followed.
    pub fn resolved(scheduler: Rc<dyn Scheduler>, value: impl Into<Value>) -> Self {
        Self::new(scheduler, |resolve, _| resolve.call(value))
    }

    /// A promise rejected with `reason`, used as-is.
    pub fn rejected(scheduler: Rc<dyn Scheduler>, reason: impl Into<Value>) -> Self {
        Self::new(scheduler, |_, reject| reject.call(reason))
    }

    /// A pending promise plus the capabilities that settle it.
    #[must_use]
    pub fn deferred(scheduler: Rc<dyn Scheduler>) -> Deferred {
        let promise = Self::pending(scheduler);
        Deferred {
            resolve: ResolveFn::direct(promise.clone()),
            reject: RejectFn::direct(promise.clone()),
            promise,
        }
    }

    /// Register handlers and return the promise fed by their outcome.
    ///
    /// The returned promise is pending. Handlers run on a later turn than both
    /// this call and the settlement of `self`, in registration order.
    pub fn then(
        &self,
        on_fulfilled: impl Into<Option<Handler>>,
        on_rejected: impl Into<Option<Handler>>,
    ) -> Promise {
        let downstream = Self::pending(Rc::clone(&self.shared.scheduler));
        self.shared.queue.borrow_mut().push(Continuation::new(
            on_fulfilled.into(),
            on_rejected.into(),
            downstream.clone(),
        ));
        self.process();
        downstream
    }

    /// Register a fulfillment-only continuation. Rejections pass through.
    pub fn on_fulfilled(
        &self,
        handler: impl FnOnce(Value) -> Result<Value, Value> + 'static,
    ) -> Promise {
        self.then(Handler::new(handler), None)
    }

    /// Register a rejection-only continuation (a catch). Values pass through.
    pub fn on_rejected(
        &self,
        handler: impl FnOnce(Value) -> Result<Value, Value> + 'static,
    ) -> Promise {
        self.then(None, Handler::new(handler))
    }

    /// Process-unique id used in diagnostics.
    #[must_use]
    pub fn id(&self) -> PromiseId {
        self.shared.id
    }

    /// True if both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// The scheduler this promise and its downstream promises defer work to.
    #[must_use]
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::clone(&self.shared.scheduler)
    }

    pub(crate) fn schedule(&self, task: Task) {
        self.shared.scheduler.schedule(task);
    }

    pub(crate) fn state_tag(&self) -> StateTag {
        self.shared.state.borrow().tag()
    }

    pub(crate) fn settlement(&self) -> Option<Settled> {
        self.shared.state.borrow().settled()
    }

    /// Move to `tag` with `payload`. A no-op returning `false` if already
    /// settled or if `tag` is `Pending`.
    pub(crate) fn transition(&self, tag: StateTag, payload: Value) -> bool {
        match Settled::from_tag(tag, payload) {
            Some(outcome) => self.settle(outcome),
            None => false,
        }
    }

    pub(crate) fn fulfill(&self, value: Value) -> bool {
        self.transition(StateTag::Fulfilled, value)
    }

    pub(crate) fn reject(&self, reason: Value) -> bool {
        self.transition(StateTag::Rejected, reason)
    }

    pub(crate) fn settle(&self, outcome: Settled) -> bool {
        let tag = outcome.tag();
        let applied = self.shared.state.borrow_mut().settle(outcome);
        if applied {
            tracing::trace!(promise = %self.id(), state = %tag, "Promise settled");
            self.process();
        }
        applied
    }

    /// Schedule a drain of the continuation queue. No-op while pending.
    fn process(&self) {
        if !self.state_tag().is_settled() {
            return;
        }
        let upstream = self.clone();
        self.schedule(Box::new(move || upstream.drain()));
    }

    /// Run queued continuations oldest first until the queue is empty,
    /// including ones appended by handlers during this drain.
    fn drain(&self) {
        let Some(settled) = self.settlement() else {
            return;
        };
        let mut processed = 0usize;
        loop {
            let next = self.shared.queue.borrow_mut().pop();
            let Some(continuation) = next else {
                break;
            };
            continuation.run(&settled);
            processed += 1;
        }
        if processed > 0 {
            tracing::trace!(promise = %self.id(), processed, "Drained continuations");
        }
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Promise");
        debug.field("id", &format_args!("{}", self.id()));
        if let Ok(state) = self.shared.state.try_borrow() {
            debug.field("state", &state.tag());
        }
        if let Ok(queue) = self.shared.queue.try_borrow() {
            debug.field("queued", &queue.len());
        }
        debug.finish()
    }
}
