//! The resolution procedure.
//!
//! Turns an arbitrary value `x` into the eventual settlement of a target
//! promise:
//!
//! 1. `x` is the target itself: reject with [`PromiseError::SelfResolution`].
//! 2. `x` is another promise: adopt its state, waiting if it is pending.
//! 3. `x` is a foreign object: read `then` once; call it if callable with a
//!    pair of one-shot capabilities, otherwise fulfill with `x`.
//! 4. Anything else: fulfill with `x`.
//!
//! Re-entry triggered from a thenable capability is deferred through the
//! target's scheduler whenever it would recurse again (the new value is itself
//! a promise or object). Chains of thenables therefore grow the task queue,
//! not the call stack.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use promis_types::PromiseError;

use crate::foreign::{Foreign, ThenMember};
use crate::promise::Promise;
use crate::queue::Handler;
use crate::value::Value;

/// Run the resolution procedure for `target` with candidate `x`.
pub(crate) fn resolve(target: &Promise, x: Value) {
    match x {
        Value::Promise(candidate) if candidate.ptr_eq(target) => {
            tracing::debug!(promise = %target.id(), "Rejecting self-resolution");
            target.reject(Value::Error(PromiseError::SelfResolution));
        }
        Value::Promise(candidate) => adopt(target, &candidate),
        Value::Object(object) => assimilate(target, &object),
        plain => {
            target.fulfill(plain);
        }
    }
}

/// Resolve from inside a thenable callback. Plain values settle immediately;
/// anything that would recurse is handed to the scheduler.
fn resolve_deferred(target: &Promise, x: Value) {
    if x.is_plain() {
        target.fulfill(x);
        return;
    }
    let deferred_target = target.clone();
    target.schedule(Box::new(move || resolve(&deferred_target, x)));
}

fn adopt(target: &Promise, source: &Promise) {
    if let Some(settled) = source.settlement() {
        target.settle(settled);
        return;
    }

    let on_value = target.clone();
    let on_reason = target.clone();
    let _ = source.then(
        Handler::new(move |value| {
            resolve(&on_value, value);
            Ok(Value::Undefined)
        }),
        Handler::new(move |reason| {
            on_reason.reject(reason);
            Ok(Value::Undefined)
        }),
    );
}

fn assimilate(target: &Promise, object: &Rc<dyn Foreign>) {
    let guard = OnceGuard::default();
    let receiver = Value::Object(Rc::clone(object));

    match object.then_member() {
        Err(reason) => {
            if guard.claim() {
                target.reject(reason);
            }
        }
        Ok(ThenMember::Callable(then)) => {
            let resolve_fn = ResolveFn::guarded(target.clone(), guard.clone());
            let reject_fn = RejectFn::guarded(target.clone(), guard.clone());
            if let Err(reason) = then(&receiver, resolve_fn, reject_fn)
                && guard.claim()
            {
                target.reject(reason);
            }
        }
        Ok(ThenMember::Absent | ThenMember::NotCallable(_)) => {
            target.fulfill(receiver);
        }
    }
}

/// Shared "first call wins" flag for one capability pair.
#[derive(Debug, Clone, Default)]
struct OnceGuard(Rc<Cell<bool>>);

impl OnceGuard {
    /// Returns true exactly once across all clones.
    fn claim(&self) -> bool {
        !self.0.replace(true)
    }
}

#[derive(Debug, Clone)]
enum Mode {
    /// Executor and deferred capabilities: every call reaches the target,
    /// whose own state machine ignores calls after settlement.
    Direct,
    /// Thenable capabilities: only the first call across the pair counts.
    Guarded(OnceGuard),
}

/// Capability that resolves its target promise with a value.
#[derive(Clone)]
pub struct ResolveFn {
    target: Promise,
    mode: Mode,
}

impl ResolveFn {
    pub(crate) fn direct(target: Promise) -> Self {
        Self {
            target,
            mode: Mode::Direct,
        }
    }

    fn guarded(target: Promise, guard: OnceGuard) -> Self {
        Self {
            target,
            mode: Mode::Guarded(guard),
        }
    }

    pub fn call(&self, value: impl Into<Value>) {
        let value = value.into();
        match &self.mode {
            Mode::Direct => resolve(&self.target, value),
            Mode::Guarded(guard) => {
                if guard.claim() {
                    resolve_deferred(&self.target, value);
                }
            }
        }
    }
}

impl fmt::Debug for ResolveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveFn")
            .field("target", &self.target.id())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Capability that rejects its target promise with a reason.
///
/// Rejection bypasses the resolution procedure: the reason is used as-is,
/// even if it is a promise or thenable.
#[derive(Clone)]
pub struct RejectFn {
    target: Promise,
    mode: Mode,
}

impl RejectFn {
    pub(crate) fn direct(target: Promise) -> Self {
        Self {
            target,
            mode: Mode::Direct,
        }
    }

    fn guarded(target: Promise, guard: OnceGuard) -> Self {
        Self {
            target,
            mode: Mode::Guarded(guard),
        }
    }

    pub fn call(&self, reason: impl Into<Value>) {
        let reason = reason.into();
        match &self.mode {
            Mode::Direct => {
                self.target.reject(reason);
            }
            Mode::Guarded(guard) => {
                if guard.claim() {
                    self.target.reject(reason);
                }
            }
        }
    }
}

impl fmt::Debug for RejectFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectFn")
            .field("target", &self.target.id())
            .field("mode", &self.mode)
            .finish()
    }
}
