//! Shared test utilities and fixtures
//!
//! Observers that record what a promise's handlers saw, plus a flush helper
//! for the deterministic microtask queue.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use promis::{Handler, MicrotaskQueue, Promise, Value};

pub type Outcome = Result<Value, Value>;

/// Every outcome delivered to the observing continuation, in order.
#[derive(Debug, Clone, Default)]
pub struct Observed(Rc<RefCell<Vec<Outcome>>>);

impl Observed {
    pub fn calls(&self) -> Vec<Outcome> {
        self.0.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// The single outcome observed. Panics unless exactly one was delivered.
    pub fn single(&self) -> Outcome {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().expect("one call")
    }
}

/// Attach a continuation that records how `promise` settles.
pub fn observe(promise: &Promise) -> Observed {
    let observed = Observed::default();
    let on_value = observed.clone();
    let on_reason = observed.clone();
    let _ = promise.then(
        Handler::new(move |value| {
            on_value.0.borrow_mut().push(Ok(value.clone()));
            Ok(value)
        }),
        Handler::new(move |reason| {
            on_reason.0.borrow_mut().push(Err(reason.clone()));
            Err(reason)
        }),
    );
    observed
}

pub fn flush(queue: &MicrotaskQueue) {
    queue.run_until_idle().expect("microtask queue should go idle");
}

/// Observe `promise`, flush, and return its single outcome.
pub fn outcome(queue: &MicrotaskQueue, promise: &Promise) -> Outcome {
    let observed = observe(promise);
    flush(queue);
    observed.single()
}

/// Shared ordered log for handler side effects.
#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

pub fn int(value: &Value) -> i64 {
    value.as_int().expect("integer value")
}
