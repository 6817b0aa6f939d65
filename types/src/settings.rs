//! Resolved runtime settings shared across crates.
//!
//! These types represent fully-validated, resolved configuration state.
//! Raw TOML deserialization structs (with `Option` fields) stay private in
//! `promis-config`. The config loader resolves them into these types at the
//! parse boundary.
//!
//! Existence of a value is the proof of its validity.

use std::num::NonZeroUsize;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("flush_budget must be greater than zero")]
    ZeroFlushBudget,
}

/// Which scheduler drives deferred work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerKind {
    /// Deterministic in-process FIFO, flushed explicitly by the embedder.
    #[default]
    Microtask,
    /// Tasks are spawned onto the current tokio `LocalSet`. Promises using it
    /// must only be settled or chained from inside a running `LocalSet`.
    LocalSet,
}

impl SchedulerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SchedulerKind::Microtask => "microtask",
            SchedulerKind::LocalSet => "local_set",
        }
    }
}

/// Upper bound on tasks executed by a single microtask flush.
///
/// Invariant: never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushBudget(NonZeroUsize);

impl FlushBudget {
    pub const DEFAULT: FlushBudget = match NonZeroUsize::new(100_000) {
        Some(tasks) => FlushBudget(tasks),
        None => panic!("default flush budget must be non-zero"),
    };

    pub fn new(tasks: usize) -> Result<Self, SettingsError> {
        NonZeroUsize::new(tasks)
            .map(Self)
            .ok_or(SettingsError::ZeroFlushBudget)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for FlushBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeSettings {
    scheduler: SchedulerKind,
    flush_budget: FlushBudget,
}

impl RuntimeSettings {
    #[must_use]
    pub const fn new(scheduler: SchedulerKind, flush_budget: FlushBudget) -> Self {
        Self {
            scheduler,
            flush_budget,
        }
    }

    #[must_use]
    pub const fn scheduler(&self) -> SchedulerKind {
        self.scheduler
    }

    #[must_use]
    pub const fn flush_budget(&self) -> FlushBudget {
        self.flush_budget
    }
}
