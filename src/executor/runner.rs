//! Runner collaborator contract
//!
//! A runner executes test modules and drives an [`EventHandler`] through
//! each module's lifecycle, one callback at a time.

#![allow(async_fn_in_trait)]

use anyhow::Result;
use std::path::PathBuf;

use crate::config::ReporterOptions;
use crate::models::AssertionList;

/// Receives lifecycle events from a runner.
///
/// Per module the order is `on_module_start`, any number of
/// `on_test_start`/`on_test_done`, then `on_module_done`. `on_done` fires
/// once after the last module.
pub trait EventHandler {
    fn on_module_start(&mut self, name: &str) -> Result<()>;

    fn on_test_start(&mut self, name: &str) -> Result<()>;

    /// The handler may annotate the test's assertions before the runner
    /// folds them into the module list.
    fn on_test_done(&mut self, name: &str, assertions: &mut AssertionList) -> Result<()>;

    fn on_module_done(&mut self, name: &str, assertions: &AssertionList) -> Result<()>;

    fn on_done(&mut self, assertions: &AssertionList) -> Result<()>;
}

/// Executes tests and reports them to an [`EventHandler`].
///
/// Both entry points must eventually call [`EventHandler::on_done`]
/// exactly once unless they fail.
pub trait TestRunner {
    /// Run the given test files, already resolved to absolute paths
    async fn run_files(
        &mut self,
        paths: &[PathBuf],
        filter: &TestFilter,
        handler: &mut dyn EventHandler,
    ) -> Result<()>;

    /// Run every module the runner discovers on its own
    async fn run_modules(
        &mut self,
        files: &[PathBuf],
        filter: &TestFilter,
        handler: &mut dyn EventHandler,
    ) -> Result<()>;
}

/// Separator between group and test segments of a full test name
pub const NAME_SEPARATOR: &str = " - ";

/// Test selection passed through to the runner
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestFilter {
    pub testspec: Option<String>,
    pub test_full_spec: Option<String>,
}

impl TestFilter {
    pub fn from_options(options: &ReporterOptions) -> Self {
        Self {
            testspec: options.testspec.clone(),
            test_full_spec: options.test_full_spec.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.testspec.is_none() && self.test_full_spec.is_none()
    }

    /// Whether the test with this full name should run
    pub fn matches(&self, name: &str) -> bool {
        if let Some(full) = &self.test_full_spec {
            if name != full {
                return false;
            }
        }

        if let Some(spec) = &self.testspec {
            let first = name.split(NAME_SEPARATOR).next().unwrap_or(name);
            if name != spec && first != spec {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TestFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches("anything"));
        assert!(filter.matches("group - case"));
    }

    #[test]
    fn test_testspec_matches_name_or_group() {
        let filter = TestFilter {
            testspec: Some("math".to_string()),
            test_full_spec: None,
        };
        assert!(filter.matches("math"));
        assert!(filter.matches("math - adds"));
        assert!(!filter.matches("strings - math"));
        assert!(!filter.matches("mathematics"));
    }

    #[test]
    fn test_full_spec_requires_exact_name() {
        let filter = TestFilter {
            testspec: None,
            test_full_spec: Some("math - adds".to_string()),
        };
        assert!(filter.matches("math - adds"));
        assert!(!filter.matches("math - subtracts"));
        assert!(!filter.matches("math"));
    }

    #[test]
    fn test_from_options() {
        let options = ReporterOptions {
            testspec: Some("a".to_string()),
            ..ReporterOptions::default()
        };
        let filter = TestFilter::from_options(&options);
        assert_eq!(filter.testspec.as_deref(), Some("a"));
        assert!(!filter.is_empty());
    }
}
