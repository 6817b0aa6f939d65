//! Promis: a promise primitive that settles exactly once.
//!
//! A [`Promise`] starts pending and settles to a value or a reason. Handlers
//! registered with [`Promise::then`] run on a later turn of the injected
//! [`Scheduler`], in registration order. Handler results go through the
//! resolution procedure, which adopts other promises and assimilates foreign
//! thenables ([`Foreign`]).
//!
//! ```
//! use promis::{MicrotaskQueue, Promise, Value};
//!
//! let queue = MicrotaskQueue::new();
//! let deferred = Promise::deferred(queue.scheduler());
//! let next = deferred
//!     .promise
//!     .on_fulfilled(|v| Ok(Value::from(v.as_int().unwrap_or(0) + 1)));
//! deferred.resolve.call(42);
//! queue.run_until_idle().unwrap();
//! # let _ = next;
//! ```

pub use promis_config::{CONFIG_ENV_VAR, ConfigError, config_path, load, load_from, parse};
pub use promis_core::{
    Deferred, FlushError, Foreign, ForeignObject, Handler, MicrotaskQueue, Promise, RejectFn,
    ResolveFn, Scheduler, Task, ThenFn, ThenMember, Value,
};
pub use promis_runtime::{LocalScheduler, RuntimeScheduler, settled};
pub use promis_types::{
    FlushBudget, PromiseError, PromiseId, RuntimeSettings, SchedulerKind, SettingsError, StateTag,
};
