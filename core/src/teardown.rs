//! Iterative teardown of promise graphs.
//!
//! A promise owns its queued continuations, which own their downstream
//! promises and whatever their handlers captured, and a settled promise owns
//! its payload. Dropping the head of a long pending chain would otherwise
//! recurse once per link. Instead, a drop that happens while another teardown
//! is running parks the parts on a thread-local list, and the outermost
//! teardown empties that list in a loop, so stack depth stays constant.

use std::cell::{Cell, RefCell};

use crate::queue::ContinuationQueue;
use crate::state::State;

/// What a dropped promise still owns.
pub(crate) type Remains = (ContinuationQueue, State);

thread_local! {
    static ACTIVE: Cell<bool> = const { Cell::new(false) };
    static PARKED: RefCell<Vec<Remains>> = const { RefCell::new(Vec::new()) };
}

/// Clears the active flag even if a captured value panics while dropping.
struct ActiveGuard;

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|active| active.set(false));
    }
}

/// Drop `remains` without recursing into nested promise teardowns.
pub(crate) fn release(remains: Remains) {
    // Thread-locals are gone during thread exit; fall back to a plain drop.
    let Ok(nested) = ACTIVE.try_with(|active| active.replace(true)) else {
        drop(remains);
        return;
    };
    if nested {
        let _ = PARKED.try_with(move |parked| parked.borrow_mut().push(remains));
        return;
    }

    let _guard = ActiveGuard;
    drop(remains);
    while let Some(next) = PARKED
        .try_with(|parked| parked.borrow_mut().pop())
        .ok()
        .flatten()
    {
        drop(next);
    }
}
