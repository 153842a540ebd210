//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "GROWL_REPORTER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Options file from GROWL_REPORTER_CONFIG
    pub config_file: Option<PathBuf>,
    /// Notifications on/off from GROWL_REPORTER_NOTIFY
    pub notify: Option<bool>,
    /// Icon directory from GROWL_REPORTER_ICONS
    pub icon_dir: Option<PathBuf>,
    /// Log level from GROWL_REPORTER_LOG
    pub log_level: Option<String>,
    /// Notification program from GROWL_REPORTER_PROGRAM
    pub program: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        Self {
            config_file: get("CONFIG").map(PathBuf::from),
            notify: get("NOTIFY").and_then(|v| parse_bool(&v)),
            icon_dir: get("ICONS").map(PathBuf::from),
            log_level: get("LOG"),
            program: get("PROGRAM"),
        }
    }

    /// Notifications are on unless explicitly disabled
    pub fn notify_or(&self, default: bool) -> bool {
        self.notify.unwrap_or(default)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_from_lookup() {
        let config = EnvConfig::from_lookup(lookup(&[
            ("GROWL_REPORTER_CONFIG", "/etc/reporter.json"),
            ("GROWL_REPORTER_NOTIFY", "0"),
            ("GROWL_REPORTER_LOG", "debug"),
            ("GROWL_REPORTER_PROGRAM", "/usr/local/bin/growlnotify"),
        ]));

        assert_eq!(
            config.config_file,
            Some(PathBuf::from("/etc/reporter.json"))
        );
        assert!(!config.notify_or(true));
        assert_eq!(config.icon_dir, None);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.program.as_deref(), Some("/usr/local/bin/growlnotify"));
    }

    #[test]
    fn test_empty_environment() {
        let config = EnvConfig::from_lookup(lookup(&[]));
        assert!(config.notify_or(true));
        assert!(config.config_file.is_none());
    }
}
