//! Core promise primitive for Promis.
//!
//! A [`Promise`] starts pending, settles exactly once to a value or a reason,
//! and accepts continuations before or after that settlement. Handler return
//! values are reconciled into the downstream promise by the resolution
//! procedure, which adopts other promises and assimilates foreign thenables.
//!
//! Nothing here runs a callback inline: all handler execution is deferred
//! through the [`Scheduler`] the promise was created with.

mod foreign;
mod promise;
mod queue;
mod resolve;
mod scheduler;
mod state;
mod teardown;
mod value;

pub use foreign::{Foreign, ForeignObject, ThenFn, ThenMember};
pub use promise::{Deferred, Promise};
pub use queue::Handler;
pub use resolve::{RejectFn, ResolveFn};
pub use scheduler::{FlushError, MicrotaskQueue, Scheduler, Task};
pub use value::Value;

pub use promis_types::{PromiseError, PromiseId, StateTag};
