use thiserror::Error;

/// Failures produced by the primitive itself.
///
/// These never escape as Rust errors across the public boundary. They are
/// delivered as rejection reasons, observable only through a rejection handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromiseError {
    /// A promise was resolved with itself.
    #[error("promise can not be resolved with itself")]
    SelfResolution,
}
