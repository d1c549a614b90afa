//! Progress reporting for pipeline steps.
//!
//! The pipeline reports through [`ProgressCallback`] so the library stays
//! independent of how progress is rendered (an `indicatif` bar in the
//! binary, nothing in tests).

use std::sync::Arc;

/// Receives progress updates from a running pipeline.
///
/// Implementations must be `Send + Sync` so one reporter can be shared
/// across tokio tasks.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of steps.
    fn set_total(&self, total: u64);

    /// Advance by `delta` steps.
    fn inc(&self, delta: u64);

    /// Describe the step currently running.
    fn set_message(&self, msg: String);

    /// Mark the run complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
