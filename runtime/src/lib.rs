//! Runtime integration for Promis.
//!
//! - **`LocalScheduler`**: drives promise work on the current tokio `LocalSet`
//! - **`RuntimeScheduler`**: picks a scheduler from resolved settings
//! - **`settled`**: awaits a promise's settlement from async code

mod bridge;
mod local;
mod select;

pub use bridge::settled;
pub use local::LocalScheduler;
pub use select::RuntimeScheduler;
