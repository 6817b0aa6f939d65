//! Interop seam for foreign thenables.
//!
//! A foreign object is anything that is not a [`Promise`](crate::Promise) but
//! may still expose a `then` member. The resolution procedure reads that
//! member exactly once per resolution, tolerates the read failing, and calls
//! it at most once with a pair of one-shot capabilities.

use std::fmt;
use std::rc::Rc;

use crate::resolve::{RejectFn, ResolveFn};
use crate::value::Value;

/// A callable `then` member.
///
/// Invoked with the object itself as receiver. `Err` models a synchronous
/// throw out of the call.
pub type ThenFn = Rc<dyn Fn(&Value, ResolveFn, RejectFn) -> Result<(), Value>>;

/// Result of reading an object's `then` member.
#[derive(Clone)]
pub enum ThenMember {
    /// The object has no `then` member.
    Absent,
    /// The object has a `then` member that cannot be called.
    NotCallable(Value),
    Callable(ThenFn),
}

impl fmt::Debug for ThenMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThenMember::Absent => f.write_str("Absent"),
            ThenMember::NotCallable(value) => f.debug_tuple("NotCallable").field(value).finish(),
            ThenMember::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// An object or callable from outside this crate.
pub trait Foreign: fmt::Debug {
    /// Read the `then` member. `Err` means the read itself threw.
    fn then_member(&self) -> Result<ThenMember, Value>;
}

#[derive(Clone)]
enum ThenSlot {
    Member(ThenMember),
    Throws(Value),
}

/// Ready-made [`Foreign`] object covering each shape the resolution
/// procedure distinguishes.
#[derive(Clone)]
pub struct ForeignObject {
    then: ThenSlot,
}

impl ForeignObject {
    /// An object without a `then` member.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            then: ThenSlot::Member(ThenMember::Absent),
        }
    }

    /// An object whose `then` member is callable.
    #[must_use]
    pub fn thenable(
        then: impl Fn(&Value, ResolveFn, RejectFn) -> Result<(), Value> + 'static,
    ) -> Self {
        Self {
            then: ThenSlot::Member(ThenMember::Callable(Rc::new(then))),
        }
    }

    /// An object whose `then` member holds a non-callable value.
    #[must_use]
    pub fn with_then_value(value: impl Into<Value>) -> Self {
        Self {
            then: ThenSlot::Member(ThenMember::NotCallable(value.into())),
        }
    }

    /// An object whose `then` accessor throws `reason` on every read.
    #[must_use]
    pub fn with_throwing_then(reason: impl Into<Value>) -> Self {
        Self {
            then: ThenSlot::Throws(reason.into()),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl Foreign for ForeignObject {
    fn then_member(&self) -> Result<ThenMember, Value> {
        match &self.then {
            ThenSlot::Member(member) => Ok(member.clone()),
            ThenSlot::Throws(reason) => Err(reason.clone()),
        }
    }
}

impl fmt::Debug for ForeignObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &self.then {
            ThenSlot::Member(ThenMember::Absent) => "plain",
            ThenSlot::Member(ThenMember::NotCallable(_)) => "non-callable then",
            ThenSlot::Member(ThenMember::Callable(_)) => "thenable",
            ThenSlot::Throws(_) => "throwing then",
        };
        f.debug_struct("ForeignObject")
            .field("shape", &shape)
            .finish()
    }
}
