//! Growl notifier reporter
//!
//! Bridges runner lifecycle events to terminal output and a single desktop
//! notification per run, while tracking which tests never finish.

pub mod notify;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::{ReporterOptions, Styles};
use crate::error::{RunResult, TestFailures};
use crate::executor::{EventHandler, TestFilter, TestRunner};
use crate::models::{AssertionList, RunSummary};
use crate::output::{unfinished_message, ReportFormatter};
use crate::tracker::Tracker;
use crate::utils::Timer;

pub use notify::{GrowlNotifier, Icon, LogNotifier, Notifier};

/// Reporter description
pub const INFO: &str = "Growl notifier";

/// Completion callback, invoked once when the run completes normally
pub type Callback = Box<dyn FnOnce(RunResult)>;

/// How a run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every assertion passed
    Passed { total: usize },
    /// At least one assertion failed
    Failed { failures: usize, total: usize },
    /// Some tests started but never finished
    Unfinished { names: Vec<String> },
    /// The runner stopped without signalling completion
    Aborted,
}

impl RunOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Passed { .. } => 0,
            RunOutcome::Failed { .. } | RunOutcome::Aborted => 1,
            RunOutcome::Unfinished { names } => names.len().clamp(1, 255) as u8,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Passed { .. })
    }
}

/// Event handler that prints progress and notifies at the end of a run
pub struct Reporter<W: Write, N: Notifier> {
    formatter: ReportFormatter,
    out: W,
    notifier: N,
    tracker: Option<Tracker>,
    timer: Timer,
    callback: Option<Callback>,
    outcome: Option<RunOutcome>,
}

impl<W: Write, N: Notifier> Reporter<W, N> {
    pub fn new(styles: Styles, out: W, notifier: N) -> Self {
        Self {
            formatter: ReportFormatter::new(styles),
            out,
            notifier,
            tracker: Some(Tracker::new()),
            timer: Timer::start("run"),
            callback: None,
            outcome: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnOnce(RunResult) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Finalize the run and return its outcome.
    ///
    /// If the runner never delivered `on_done`, the tracker is checked here
    /// instead.
    pub fn finish(mut self) -> Result<RunOutcome> {
        if let Some(tracker) = self.tracker.take() {
            if !self.finalize_tracker(tracker)? {
                warn!("Runner returned without signalling completion");
                let message = "FAILURES: run ended before completion";
                write!(self.out, "{}", self.formatter.aborted(message))?;
                self.notifier.notify(Icon::Failed, message);
                self.outcome = Some(RunOutcome::Aborted);
            }
        }

        self.out.flush()?;
        Ok(self.outcome.unwrap_or(RunOutcome::Aborted))
    }

    /// Run the tracker's completion check. Returns true when the
    /// unfinished-test path fired.
    fn finalize_tracker(&mut self, tracker: Tracker) -> Result<bool> {
        tracker.finalize(|t| -> Result<bool> {
            if t.unfinished() == 0 {
                return Ok(false);
            }

            let names = t.names();
            for name in &names {
                warn!(
                    test = %name,
                    running_ms = t.running_ms(name).unwrap_or(0),
                    "test never finished"
                );
            }

            write!(self.out, "{}", self.formatter.unfinished(&names))?;
            self.notifier.notify(Icon::Failed, &unfinished_message(&names));
            self.outcome = Some(RunOutcome::Unfinished { names });
            Ok(true)
        })
    }
}

impl<W: Write, N: Notifier> EventHandler for Reporter<W, N> {
    fn on_module_start(&mut self, name: &str) -> Result<()> {
        debug!(module = %name, "module start");
        write!(self.out, "{}", self.formatter.module_header(name))?;
        self.out.flush()?;
        Ok(())
    }

    fn on_test_start(&mut self, name: &str) -> Result<()> {
        debug!(test = %name, "test start");
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.put(name);
        }
        Ok(())
    }

    fn on_test_done(&mut self, name: &str, assertions: &mut AssertionList) -> Result<()> {
        debug!(test = %name, failures = assertions.failures(), "test done");
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.remove(name);
        }

        let failed = assertions.failures() > 0;
        if failed {
            for assertion in assertions.iter_mut() {
                assertion.test_name = Some(name.to_string());
            }
        }

        write!(self.out, "{}", self.formatter.test_marker(failed))?;
        self.out.flush()?;
        Ok(())
    }

    fn on_module_done(&mut self, name: &str, assertions: &AssertionList) -> Result<()> {
        debug!(module = %name, failures = assertions.failures(), "module done");
        writeln!(self.out)?;

        for assertion in assertions.failed() {
            write!(self.out, "{}", self.formatter.failure_detail(assertion))?;
        }
        Ok(())
    }

    fn on_done(&mut self, assertions: &AssertionList) -> Result<()> {
        let Some(tracker) = self.tracker.take() else {
            warn!("Ignoring repeated completion signal");
            return Ok(());
        };

        if self.finalize_tracker(tracker)? {
            return Ok(());
        }

        if assertions.is_empty() {
            debug!("Run completed without any assertions");
        }

        let summary = RunSummary::new(assertions, self.timer.elapsed_ms());
        info!(
            "Run completed in {}ms: {}/{} assertions failed",
            summary.elapsed_ms, summary.failures, summary.total
        );

        write!(self.out, "{}", self.formatter.tally(&summary))?;
        self.out.flush()?;

        let (icon, outcome, result) = if summary.is_success() {
            (
                Icon::Success,
                RunOutcome::Passed {
                    total: summary.total,
                },
                Ok(()),
            )
        } else {
            (
                Icon::Failed,
                RunOutcome::Failed {
                    failures: summary.failures,
                    total: summary.total,
                },
                Err(TestFailures {
                    failures: summary.failures,
                    total: summary.total,
                }),
            )
        };

        self.notifier.notify(icon, &summary.to_string());
        self.outcome = Some(outcome);

        if let Some(callback) = self.callback.take() {
            callback(result);
        }
        Ok(())
    }
}

/// Run `files` through `runner`, reporting to `out` and `notifier`.
///
/// Options default to the bundled configuration. `callback` receives the
/// pass/fail result once the runner signals completion; it is not called
/// when the run ends with unfinished tests.
pub async fn run<R, W, N>(
    runner: &mut R,
    files: &[PathBuf],
    options: Option<ReporterOptions>,
    out: W,
    notifier: N,
    callback: impl FnOnce(RunResult) + 'static,
) -> Result<RunOutcome>
where
    R: TestRunner,
    W: Write,
    N: Notifier,
{
    let options = match options {
        Some(options) => options,
        None => ReporterOptions::load_default()?,
    };

    let filter = TestFilter::from_options(&options);
    if !filter.is_empty() {
        info!("Selecting tests with {:?}", filter);
    }
    let mut reporter = Reporter::new(options.styles, out, notifier).with_callback(callback);

    if files.is_empty() {
        runner.run_modules(files, &filter, &mut reporter).await?;
    } else {
        let paths = files
            .iter()
            .map(|p| {
                std::path::absolute(p)
                    .with_context(|| format!("Failed to resolve path: {}", p.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        runner.run_files(&paths, &filter, &mut reporter).await?;
    }

    reporter.finish()
}
