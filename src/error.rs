//! Error types for the range engine.

use chrono::NaiveDate;

/// A proposed range whose start falls after its stop once both are truncated
/// to whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid date range: start {start} is after stop {stop}")]
pub struct InvalidRangeError {
    pub start: NaiveDate,
    pub stop: NaiveDate,
}

/// Failure of a controller transition. Either way the controller keeps the
/// state it had before the call.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    /// The record store could not answer; its error is passed through as is.
    #[error(transparent)]
    Store(anyhow::Error),
}
