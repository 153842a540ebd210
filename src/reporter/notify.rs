//! Desktop notification dispatch
//!
//! Notifications are fire-and-forget: the child process is never awaited
//! and its exit status is never looked at.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

/// Notification icon selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Success,
    Failed,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Success => "success",
            Icon::Failed => "failed",
        }
    }

    /// Image file for this icon inside `dir`
    pub fn image_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.png", self.as_str()))
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends one terminal notification per run
pub trait Notifier {
    fn notify(&self, icon: Icon, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, icon: Icon, message: &str) {
        (**self).notify(icon, message)
    }
}

/// Notifier backed by the `growlnotify` command
#[derive(Clone, Debug)]
pub struct GrowlNotifier {
    shell: String,
    program: String,
    app_name: String,
    icon_dir: PathBuf,
}

impl GrowlNotifier {
    pub fn new(icon_dir: impl Into<PathBuf>) -> Self {
        Self {
            shell: "sh".to_string(),
            program: "growlnotify".to_string(),
            app_name: "growl-reporter".to_string(),
            icon_dir: icon_dir.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Shell command line for one notification.
    ///
    /// The message is single-quoted and not escaped.
    pub fn command_line(&self, icon: Icon, message: &str) -> String {
        format!(
            "{} --image {} -n {} -m '{}'",
            self.program,
            icon.image_path(&self.icon_dir).display(),
            self.app_name,
            message
        )
    }

    fn spawn(&self, command: &str) -> io::Result<Child> {
        Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}

#[cfg(test)]
impl GrowlNotifier {
    fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Notifier for GrowlNotifier {
    fn notify(&self, icon: Icon, message: &str) {
        let command = self.command_line(icon, message);
        debug!("Dispatching notification: {}", command);

        match self.spawn(&command) {
            Ok(child) => debug!(pid = child.id(), "Notification process started"),
            Err(e) => warn!("Failed to spawn notification process: {}", e),
        }
    }
}

/// Notifier that only logs
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, icon: Icon, message: &str) {
        info!(icon = %icon, "{}", message);
    }
}
