//! Unfinished test tracking
//!
//! Keeps the set of in-flight tests for one run. A test is in flight from
//! its start event until its matching done event; whatever is left when the
//! runner signals completion never finished.

use indexmap::IndexMap;
use std::time::Instant;

/// In-flight test set for a single run
///
/// Mutation is not synchronized; callers drive it from one thread of control.
#[derive(Debug, Default)]
pub struct Tracker {
    /// Start marker per test, in the order tests started
    in_flight: IndexMap<String, Instant>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as in flight.
    ///
    /// A name that is already in flight is overwritten in place: it keeps
    /// its original position in [`names`](Self::names) and gets a fresh
    /// start marker.
    pub fn put(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.in_flight.contains_key(&name) {
            tracing::debug!(test = %name, "test started twice without finishing");
        }
        self.in_flight.insert(name, Instant::now());
    }

    /// Clear `name` from the in-flight set. Unknown names are ignored.
    pub fn remove(&mut self, name: &str) {
        if self.in_flight.shift_remove(name).is_none() {
            tracing::debug!(test = %name, "finished test was not in flight");
        }
    }

    /// Number of tests still in flight
    pub fn unfinished(&self) -> usize {
        self.in_flight.len()
    }

    /// In-flight test names in the order they started
    pub fn names(&self) -> Vec<String> {
        self.in_flight.keys().cloned().collect()
    }

    /// Milliseconds `name` has been in flight, if it is
    pub fn running_ms(&self, name: &str) -> Option<u64> {
        self.in_flight
            .get(name)
            .map(|started| started.elapsed().as_millis() as u64)
    }

    /// Run the completion handler against the final state.
    ///
    /// Consumes the tracker, so the handler runs exactly once per run.
    pub fn finalize<R>(self, on_complete: impl FnOnce(&Tracker) -> R) -> R {
        on_complete(&self)
    }
}
