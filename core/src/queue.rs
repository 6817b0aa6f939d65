//! Continuation records and the per-promise queue that holds them.

use std::collections::VecDeque;
use std::fmt;

use crate::promise::Promise;
use crate::resolve::resolve;
use crate::state::Settled;
use crate::value::Value;

/// A fulfillment or rejection handler.
///
/// Receives the settled value or reason as its only argument. `Err` models a
/// synchronous throw and rejects the downstream promise with that reason.
/// Closures carry no implicit receiver, so handlers are always called "as
/// functions".
pub struct Handler(Box<dyn FnOnce(Value) -> Result<Value, Value>>);

impl Handler {
    #[must_use]
    pub fn new(handler: impl FnOnce(Value) -> Result<Value, Value> + 'static) -> Self {
        Self(Box::new(handler))
    }

    fn call(self, argument: Value) -> Result<Value, Value> {
        (self.0)(argument)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// One `then` registration: optional handlers plus the promise they feed.
#[derive(Debug)]
pub(crate) struct Continuation {
    on_fulfilled: Option<Handler>,
    on_rejected: Option<Handler>,
    downstream: Promise,
}

impl Continuation {
    pub(crate) fn new(
        on_fulfilled: Option<Handler>,
        on_rejected: Option<Handler>,
        downstream: Promise,
    ) -> Self {
        Self {
            on_fulfilled,
            on_rejected,
            downstream,
        }
    }

    /// Run the handler matching `settled` and route its outcome into the
    /// downstream promise.
    ///
    /// A missing handler passes the settlement through unchanged: identity on
    /// fulfillment, rethrow on rejection.
    pub(crate) fn run(self, settled: &Settled) {
        let outcome = match settled {
            Settled::Fulfilled(value) => match self.on_fulfilled {
                Some(handler) => handler.call(value.clone()),
                None => Ok(value.clone()),
            },
            Settled::Rejected(reason) => match self.on_rejected {
                Some(handler) => handler.call(reason.clone()),
                None => Err(reason.clone()),
            },
        };
        match outcome {
            Ok(value) => resolve(&self.downstream, value),
            Err(reason) => {
                self.downstream.reject(reason);
            }
        }
    }
}

/// Append-only until drained; drained strictly oldest first.
#[derive(Debug, Default)]
pub(crate) struct ContinuationQueue {
    entries: VecDeque<Continuation>,
}

impl ContinuationQueue {
    pub(crate) fn push(&mut self, continuation: Continuation) {
        self.entries.push_back(continuation);
    }

    pub(crate) fn pop(&mut self) -> Option<Continuation> {
        self.entries.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
