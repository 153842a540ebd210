//! Run-level error values

use thiserror::Error;

/// Error handed to the completion callback when any assertion failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("We have got test failures.")]
pub struct TestFailures {
    pub failures: usize,
    pub total: usize,
}

/// Result delivered to the completion callback
pub type RunResult = std::result::Result<(), TestFailures>;
