//! Report text formatting
//!
//! Turns lifecycle events and assertion results into the text the
//! reporter prints. Styling comes from the configured templates.

use crate::config::Styles;
use crate::models::{Assertion, RunSummary};

/// Formatter for reporter output
#[derive(Clone, Debug, Default)]
pub struct ReportFormatter {
    styles: Styles,
}

impl ReportFormatter {
    pub fn new(styles: Styles) -> Self {
        Self { styles }
    }

    /// Module header, printed without a trailing newline
    pub fn module_header(&self, name: &str) -> String {
        format!("{}: ", self.styles.bold(name))
    }

    /// Progress marker for one finished test
    pub fn test_marker(&self, failed: bool) -> String {
        if failed {
            self.styles.red("F")
        } else {
            ".".to_string()
        }
    }

    /// Detail block for one failed assertion
    pub fn failure_detail(&self, assertion: &Assertion) -> String {
        let mut output = String::new();

        let error = assertion.error.clone().unwrap_or_default();
        if let (true, Some(message)) = (error.is_assertion(), &assertion.message) {
            output.push_str(&format!(
                "Assertion in test {}: {}\n",
                self.styles.bold(assertion.test_name.as_deref().unwrap_or("")),
                self.styles.magenta(message)
            ));
        }

        output.push_str(&error.trace());
        output.push_str("\n\n");
        output
    }

    /// Final tally line, preceded by a blank line
    pub fn tally(&self, summary: &RunSummary) -> String {
        if summary.is_success() {
            format!(
                "\n{}{} assertions ({}ms)\n",
                self.styles.bold(&self.styles.green("OK: ")),
                summary.total,
                summary.duration_ms
            )
        } else {
            format!(
                "\n{}{}/{} assertions failed ({}ms)\n",
                self.styles.bold(&self.styles.red("FAILURES: ")),
                summary.failures,
                summary.total,
                summary.duration_ms
            )
        }
    }

    /// Closing line for a run that never signalled completion
    pub fn aborted(&self, message: &str) -> String {
        format!("\n{}\n", self.styles.bold(&self.styles.red(message)))
    }

    /// Diagnostics for tests that never finished
    pub fn unfinished(&self, names: &[String]) -> String {
        let mut output = String::from("\n");
        output.push_str(&self.styles.red(&self.styles.bold(
            "FAILURES: Unfinished tests (or their setups/teardowns): ",
        )));
        output.push('\n');

        for name in names {
            output.push_str(&format!("- {name}\n"));
        }

        output.push('\n');
        output.push_str("To fix this, make sure all tests signal completion\n");
        output
    }
}

/// Notification text for tests that never finished
pub fn unfinished_message(names: &[String]) -> String {
    format!("FAILURES: Unfinished tests: {}", names.join(", "))
}
