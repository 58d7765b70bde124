//! Shared building blocks for `leasefetch`.
//!
//! * **[`device`]**: the records that flow through the pipeline.
//! * **[`config`]**: the run configuration handed to every stage.
//! * **[`error`]**: fatal configuration errors.
//! * **[`log`]**: logging macros used across the workspace.

pub mod config;
pub mod device;
pub mod error;
pub mod log;

#[doc(hidden)]
pub use tracing as __tracing;
