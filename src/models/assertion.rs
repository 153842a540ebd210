//! Assertion result models
//!
//! Defines assertions, the lists they are aggregated into, and the
//! run summary computed when a run completes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of error attached to a failed assertion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A failed check (`AssertionError` style)
    Assertion,
    /// Anything else thrown while the test ran
    #[default]
    Error,
}

/// Structured error carried by a failed assertion
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssertionFailure {
    #[serde(default)]
    pub kind: ErrorKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub actual: Option<serde_json::Value>,
    #[serde(default)]
    pub expected: Option<serde_json::Value>,
    #[serde(default)]
    pub operator: Option<String>,
}

impl AssertionFailure {
    pub fn is_assertion(&self) -> bool {
        self.kind == ErrorKind::Assertion
    }

    /// Heading line used when no stack trace is available
    fn heading(&self) -> String {
        let name = self.name.as_deref().unwrap_or(match self.kind {
            ErrorKind::Assertion => "AssertionError",
            ErrorKind::Error => "Error",
        });
        match &self.message {
            Some(message) => format!("{name}: {message}"),
            None => name.to_string(),
        }
    }

    /// Full trace as printed in failure details.
    ///
    /// Assertion errors that carry both `actual` and `expected` get their
    /// first line rewritten to `AssertionError: <actual> <op> <expected>`.
    pub fn trace(&self) -> String {
        let stack = self.stack.clone().unwrap_or_else(|| self.heading());

        match (&self.actual, &self.expected) {
            (Some(actual), Some(expected)) if self.is_assertion() => {
                let operator = self.operator.as_deref().unwrap_or("==");
                let first = format!("AssertionError: {actual} {operator} {expected}");
                match stack.split_once('\n') {
                    Some((_, rest)) => format!("{first}\n{rest}"),
                    None => first,
                }
            }
            _ => stack,
        }
    }
}

/// Result of one check made during a test
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    #[serde(default = "default_passed")]
    pub passed: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<AssertionFailure>,
    #[serde(default, rename = "testname", alias = "test_name")]
    pub test_name: Option<String>,
}

fn default_passed() -> bool {
    true
}

impl Assertion {
    pub fn failed(&self) -> bool {
        !self.passed
    }
}

/// Ordered assertions with derived counters
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssertionList {
    assertions: Vec<Assertion>,
    /// Elapsed time attributed to this list
    pub duration_ms: u64,
}

impl AssertionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(assertions: Vec<Assertion>, duration_ms: u64) -> Self {
        Self {
            assertions,
            duration_ms,
        }
    }

    /// Move every assertion of `other` onto the end of this list
    pub fn append(&mut self, other: AssertionList) {
        self.assertions.extend(other.assertions);
    }

    pub fn failures(&self) -> usize {
        self.assertions.iter().filter(|a| a.failed()).count()
    }

    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Assertion> {
        self.assertions.iter_mut()
    }

    pub fn failed(&self) -> impl Iterator<Item = &Assertion> {
        self.assertions.iter().filter(|a| a.failed())
    }
}

/// Totals computed when a run completes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub failures: usize,
    /// Duration reported by the runner for the whole list
    pub duration_ms: u64,
    /// Wall-clock time observed by the reporter
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn new(assertions: &AssertionList, elapsed_ms: u64) -> Self {
        Self {
            total: assertions.len(),
            failures: assertions.failures(),
            duration_ms: assertions.duration_ms,
            elapsed_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(
                f,
                "Success: {} assertions passed ({}ms)",
                self.total, self.duration_ms
            )
        } else {
            write!(
                f,
                "FAILURES: {}/{} assertions failed ({}ms)",
                self.failures, self.total, self.duration_ms
            )
        }
    }
}

#[cfg(test)]
impl AssertionFailure {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Assertion,
            name: Some("AssertionError".to_string()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Error,
            name: Some(name.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_values(
        mut self,
        actual: serde_json::Value,
        expected: serde_json::Value,
        operator: impl Into<String>,
    ) -> Self {
        self.actual = Some(actual);
        self.expected = Some(expected);
        self.operator = Some(operator.into());
        self
    }
}

#[cfg(test)]
impl Assertion {
    pub fn pass(message: Option<&str>) -> Self {
        Self {
            passed: true,
            message: message.map(str::to_string),
            error: None,
            test_name: None,
        }
    }

    pub fn fail(message: Option<&str>, error: AssertionFailure) -> Self {
        Self {
            passed: false,
            message: message.map(str::to_string),
            error: Some(error),
            test_name: None,
        }
    }
}

#[cfg(test)]
impl AssertionList {
    pub fn iter(&self) -> impl Iterator<Item = &Assertion> {
        self.assertions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_counters() {
        let list = AssertionList::from_vec(
            vec![
                Assertion::pass(None),
                Assertion::fail(
                    Some("values differ"),
                    AssertionFailure::assertion("values differ"),
                ),
                Assertion::pass(Some("ok")),
            ],
            0,
        );

        assert!(!list.is_empty());
        assert!(AssertionList::new().is_empty());
        assert_eq!(list.len(), 3);
        assert_eq!(list.failures(), 1);
        assert_eq!(list.failed().count(), 1);
    }

    #[test]
    fn test_append_keeps_order() {
        let mut first = AssertionList::from_vec(vec![Assertion::pass(Some("a"))], 5);
        let second = AssertionList::from_vec(vec![Assertion::pass(Some("b"))], 7);
        first.append(second);

        let messages: Vec<_> = first.iter().filter_map(|a| a.message.as_deref()).collect();
        assert_eq!(messages, vec!["a", "b"]);
        assert_eq!(first.duration_ms, 5);
    }

    #[test]
    fn test_trace_rewrites_assertion_values() {
        let failure = AssertionFailure::assertion("boom")
            .with_stack("AssertionError: boom\n    at test.js:3:5")
            .with_values(json!(1), json!(2), "strictEqual");

        assert_eq!(
            failure.trace(),
            "AssertionError: 1 strictEqual 2\n    at test.js:3:5"
        );
    }

    #[test]
    fn test_trace_without_stack() {
        let failure = AssertionFailure::error("TypeError", "x is undefined");
        assert_eq!(failure.trace(), "TypeError: x is undefined");

        let failure = AssertionFailure::assertion("nope").with_values(json!("a"), json!("b"), "==");
        assert_eq!(failure.trace(), "AssertionError: \"a\" == \"b\"");
    }

    #[test]
    fn test_deserialize_assertion() {
        let assertion: Assertion = serde_json::from_value(json!({
            "passed": false,
            "message": "should match",
            "error": {"kind": "assertion", "message": "should match"}
        }))
        .unwrap();

        assert!(assertion.failed());
        assert!(assertion.error.unwrap().is_assertion());
        assert_eq!(assertion.test_name, None);
    }

    #[test]
    fn test_summary_display() {
        let list = AssertionList::from_vec(vec![Assertion::pass(None), Assertion::pass(None)], 12);
        let summary = RunSummary::new(&list, 15);
        assert!(summary.is_success());
        assert_eq!(summary.to_string(), "Success: 2 assertions passed (12ms)");
    }
}
