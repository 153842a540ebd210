//! Lifecycle event models
//!
//! One event per line in the newline-delimited JSON stream a runner emits.

use serde::Deserialize;

use super::Assertion;

/// A single lifecycle event
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    ModuleStart {
        name: String,
    },
    TestStart {
        name: String,
    },
    TestDone {
        name: String,
        #[serde(default)]
        assertions: Vec<Assertion>,
        #[serde(default)]
        duration_ms: Option<u64>,
    },
    ModuleDone {
        name: String,
        #[serde(default)]
        duration_ms: Option<u64>,
    },
    Done,
}

impl RunEvent {
    /// Parse one line of the event stream
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}
