//! Test execution collaborators
//!
//! Defines the runner contract and the bundled event-stream runner.

mod runner;
mod stream;

pub use runner::{EventHandler, TestFilter, TestRunner};
pub use stream::EventStreamRunner;
