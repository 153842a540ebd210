//! Data models for test reporting
//!
//! Assertions, assertion lists, run summaries and lifecycle events.

mod assertion;
mod event;

pub use assertion::{Assertion, AssertionFailure, AssertionList, RunSummary};
pub use event::RunEvent;
