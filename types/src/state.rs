use std::fmt;

/// Settlement state of a promise, without its payload.
///
/// This is a closed enum: a promise is in exactly one of these states, and the
/// only legal edges are `Pending -> Fulfilled` and `Pending -> Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateTag {
    Pending,
    Fulfilled,
    Rejected,
}

impl StateTag {
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, StateTag::Pending)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StateTag::Pending => "pending",
            StateTag::Fulfilled => "fulfilled",
            StateTag::Rejected => "rejected",
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
