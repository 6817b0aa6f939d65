//! Settlement state machine.
//!
//! Legal edges: `Pending -> Fulfilled`, `Pending -> Rejected`. Every other
//! attempted transition is a silent no-op.

use promis_types::StateTag;

use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub(crate) enum State {
    #[default]
    Pending,
    Fulfilled(Value),
    Rejected(Value),
}

/// A terminal outcome. Its existence proves the target state is not `Pending`.
#[derive(Debug, Clone)]
pub(crate) enum Settled {
    Fulfilled(Value),
    Rejected(Value),
}

impl Settled {
    /// Pair a requested target state with its payload. `Pending` is not a
    /// valid target and yields `None`.
    pub(crate) fn from_tag(tag: StateTag, payload: Value) -> Option<Self> {
        match tag {
            StateTag::Pending => None,
            StateTag::Fulfilled => Some(Settled::Fulfilled(payload)),
            StateTag::Rejected => Some(Settled::Rejected(payload)),
        }
    }

    pub(crate) const fn tag(&self) -> StateTag {
        match self {
            Settled::Fulfilled(_) => StateTag::Fulfilled,
            Settled::Rejected(_) => StateTag::Rejected,
        }
    }
}

impl State {
    pub(crate) const fn tag(&self) -> StateTag {
        match self {
            State::Pending => StateTag::Pending,
            State::Fulfilled(_) => StateTag::Fulfilled,
            State::Rejected(_) => StateTag::Rejected,
        }
    }

    /// Snapshot of the terminal outcome, if settled.
    pub(crate) fn settled(&self) -> Option<Settled> {
        match self {
            State::Pending => None,
            State::Fulfilled(value) => Some(Settled::Fulfilled(value.clone())),
            State::Rejected(reason) => Some(Settled::Rejected(reason.clone())),
        }
    }

    /// Apply `outcome` if still pending. Returns whether the state changed.
    pub(crate) fn settle(&mut self, outcome: Settled) -> bool {
        if !matches!(self, State::Pending) {
            return false;
        }
        *self = match outcome {
            Settled::Fulfilled(value) => State::Fulfilled(value),
            Settled::Rejected(reason) => State::Rejected(reason),
        };
        true
    }
}
