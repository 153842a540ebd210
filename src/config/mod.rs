//! Configuration module
//!
//! Handles loading reporter options: terminal styling templates and the
//! test-selection filters passed through to the runner.

pub mod env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default options, compiled into the binary
const BUNDLED_OPTIONS: &str = include_str!("../../assets/reporter.json");

/// Icon directory name, looked up next to the executable
const ICON_DIR_NAME: &str = "growl-icons";

/// Default directory holding notification icons
pub fn default_icon_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ICON_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(ICON_DIR_NAME))
}

/// Terminal styling templates
///
/// Each pair wraps a string in a prefix and suffix, typically ANSI escapes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Styles {
    pub error_prefix: String,
    pub error_suffix: String,
    pub ok_prefix: String,
    pub ok_suffix: String,
    pub assertion_prefix: String,
    pub assertion_suffix: String,
    pub bold_prefix: String,
    pub bold_suffix: String,
}

impl Styles {
    pub fn red(&self, s: &str) -> String {
        format!("{}{}{}", self.error_prefix, s, self.error_suffix)
    }

    pub fn green(&self, s: &str) -> String {
        format!("{}{}{}", self.ok_prefix, s, self.ok_suffix)
    }

    pub fn magenta(&self, s: &str) -> String {
        format!("{}{}{}", self.assertion_prefix, s, self.assertion_suffix)
    }

    pub fn bold(&self, s: &str) -> String {
        format!("{}{}{}", self.bold_prefix, s, self.bold_suffix)
    }
}

/// Reporter options
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterOptions {
    #[serde(flatten)]
    pub styles: Styles,

    /// Only run tests with this name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testspec: Option<String>,

    /// Only run the test with this full name
    #[serde(
        default,
        rename = "testFullSpec",
        alias = "test_full_spec",
        skip_serializing_if = "Option::is_none"
    )]
    pub test_full_spec: Option<String>,
}

impl ReporterOptions {
    /// Load the bundled default options
    pub fn load_default() -> Result<Self> {
        let options =
            serde_json::from_str(BUNDLED_OPTIONS).context("Failed to parse bundled config")?;
        tracing::debug!("Loaded bundled reporter options");
        Ok(options)
    }

    /// Load options from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let options: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        tracing::debug!("Loaded reporter options from {}", path.display());
        Ok(options)
    }

    pub fn with_testspec(mut self, testspec: Option<String>) -> Self {
        if testspec.is_some() {
            self.testspec = testspec;
        }
        self
    }

    pub fn with_test_full_spec(mut self, test_full_spec: Option<String>) -> Self {
        if test_full_spec.is_some() {
            self.test_full_spec = test_full_spec;
        }
        self
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_bundled_defaults() {
        let options = ReporterOptions::load_default().unwrap();
        assert_eq!(options.styles.bold_prefix, "\x1b[1m");
        assert_eq!(options.styles.error_prefix, "\x1b[31m");
        assert_eq!(options.testspec, None);
    }

    #[test]
    fn test_bundled_defaults_do_not_depend_on_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let copy = dir.path().join("reporter.json");
        std::fs::write(&copy, BUNDLED_OPTIONS).unwrap();

        assert_eq!(
            ReporterOptions::load_default().unwrap(),
            ReporterOptions::load(&copy).unwrap()
        );
    }

    #[test]
    fn test_default_icon_dir_is_next_to_executable() {
        let dir = default_icon_dir();
        let exe = std::env::current_exe().unwrap();

        assert!(dir.is_absolute());
        assert!(dir.ends_with(ICON_DIR_NAME));
        assert_eq!(dir.parent(), exe.parent());
    }

    #[test]
    fn test_load_json_with_filters() {
        let file = write_temp(
            ".json",
            r#"{
                "error_prefix": "<r>", "error_suffix": "</r>",
                "ok_prefix": "<g>", "ok_suffix": "</g>",
                "assertion_prefix": "<m>", "assertion_suffix": "</m>",
                "bold_prefix": "<b>", "bold_suffix": "</b>",
                "testspec": "group", "testFullSpec": "group - case"
            }"#,
        );

        let options = ReporterOptions::load(file.path()).unwrap();
        assert_eq!(options.styles.red("x"), "<r>x</r>");
        assert_eq!(options.styles.bold("x"), "<b>x</b>");
        assert_eq!(options.testspec.as_deref(), Some("group"));
        assert_eq!(options.test_full_spec.as_deref(), Some("group - case"));
    }

    #[test]
    fn test_load_yaml() {
        let file = write_temp(
            ".yaml",
            "error_prefix: ''\nerror_suffix: ''\nok_prefix: '['\nok_suffix: ']'\n\
             assertion_prefix: ''\nassertion_suffix: ''\nbold_prefix: ''\nbold_suffix: ''\n",
        );

        let options = ReporterOptions::load(file.path()).unwrap();
        assert_eq!(options.styles.green("ok"), "[ok]");
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReporterOptions::load(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_json_fails() {
        let file = write_temp(".json", "{ not json");
        let err = ReporterOptions::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON config"));
    }

    #[test]
    fn test_missing_field_fails() {
        let file = write_temp(".json", r#"{"error_prefix": ""}"#);
        assert!(ReporterOptions::load(file.path()).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let options = ReporterOptions {
            testspec: Some("from-file".to_string()),
            ..ReporterOptions::default()
        }
        .with_testspec(None)
        .with_test_full_spec(Some("a - b".to_string()));

        assert_eq!(options.testspec.as_deref(), Some("from-file"));
        assert_eq!(options.test_full_spec.as_deref(), Some("a - b"));
    }
}
