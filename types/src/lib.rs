//! Core domain types for Promis.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the workspace.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod error;
mod ids;
mod settings;
mod state;

pub use error::PromiseError;
pub use ids::PromiseId;
pub use settings::{FlushBudget, RuntimeSettings, SchedulerKind, SettingsError};
pub use state::StateTag;
