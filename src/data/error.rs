//! Error types for the status engine.

use thiserror::Error;

/// Errors reported by engine lookups and history checks.
///
/// Missing incident data is never an error; it surfaces as
/// [`MonitorStatus::NoData`](super::MonitorStatus::NoData).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No configured monitor has this id.
    #[error("Monitor not found: {0}")]
    MonitorNotFound(String),

    /// A monitor's incident history breaks the append-only ordering rules.
    #[error("Invalid incident history for {monitor}: {reason}")]
    InvalidHistory {
        /// Monitor whose history is malformed.
        monitor: String,
        /// What rule was broken.
        reason: String,
    },
}
