//! Event stream runner
//!
//! Replays newline-delimited JSON lifecycle events written by an external
//! test runner, building the per-module and run-level assertion lists and
//! driving an [`EventHandler`] one event at a time.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::mem;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use super::runner::{EventHandler, TestFilter, TestRunner};
use crate::models::{AssertionList, RunEvent};
use crate::utils::Timer;

/// Runner over recorded or piped lifecycle events
pub struct EventStreamRunner {
    source_name: String,
    source: Option<Box<dyn AsyncBufRead + Unpin>>,
}

impl EventStreamRunner {
    /// Read the module stream from standard input
    pub fn stdin() -> Self {
        Self::from_reader("<stdin>", BufReader::new(tokio::io::stdin()))
    }

    /// Read the module stream from `reader`
    pub fn from_reader(name: impl Into<String>, reader: impl AsyncBufRead + Unpin + 'static) -> Self {
        Self {
            source_name: name.into(),
            source: Some(Box::new(reader)),
        }
    }

    /// Read the module stream from an event log file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open event stream: {}", path.display()))?;
        Ok(Self::from_reader(path.display().to_string(), BufReader::new(file)))
    }
}

impl TestRunner for EventStreamRunner {
    /// Each path is the event log of one module. A `done` event inside a
    /// log is ignored; completion fires once after the last file.
    async fn run_files(
        &mut self,
        paths: &[PathBuf],
        filter: &TestFilter,
        handler: &mut dyn EventHandler,
    ) -> Result<()> {
        info!("Replaying {} event log(s)", paths.len());
        let mut replay = Replay::new(filter, handler, false);

        for path in paths {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open event log: {}", path.display()))?;
            replay
                .replay(&path.display().to_string(), BufReader::new(file))
                .await?;
        }

        replay.finish()
    }

    async fn run_modules(
        &mut self,
        files: &[PathBuf],
        filter: &TestFilter,
        handler: &mut dyn EventHandler,
    ) -> Result<()> {
        debug!(?files, "Running discovered modules from {}", self.source_name);
        let source = self
            .source
            .take()
            .with_context(|| format!("Event stream already consumed: {}", self.source_name))?;

        let mut replay = Replay::new(filter, handler, true);
        replay.replay(&self.source_name, source).await?;
        replay.finish()
    }
}

/// Aggregation state for one run
struct Replay<'a> {
    filter: &'a TestFilter,
    handler: &'a mut dyn EventHandler,
    /// Whether a `done` event in the stream completes the run
    honor_done: bool,
    module: AssertionList,
    /// Module started but not yet reported done
    open_module: Option<String>,
    run: AssertionList,
    module_timer: Timer,
    skipped: HashSet<String>,
    done: bool,
}

impl<'a> Replay<'a> {
    fn new(filter: &'a TestFilter, handler: &'a mut dyn EventHandler, honor_done: bool) -> Self {
        Self {
            filter,
            handler,
            honor_done,
            module: AssertionList::new(),
            open_module: None,
            run: AssertionList::new(),
            module_timer: Timer::start("module"),
            skipped: HashSet::new(),
            done: false,
        }
    }

    async fn replay(&mut self, name: &str, reader: impl AsyncBufRead + Unpin) -> Result<()> {
        let mut lines = reader.lines();
        let mut line_no = 0usize;

        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("Failed to read event stream: {name}"))?
        {
            line_no += 1;
            if self.done {
                debug!("Ignoring events after completion in {}", name);
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event = RunEvent::parse(line)
                .with_context(|| format!("Invalid event at {name}:{line_no}"))?;
            self.apply(event)?;
        }

        Ok(())
    }

    fn apply(&mut self, event: RunEvent) -> Result<()> {
        match event {
            RunEvent::ModuleStart { name } => {
                self.close_open_module()?;
                self.module = AssertionList::new();
                self.module_timer.restart();
                self.open_module = Some(name.clone());
                self.handler.on_module_start(&name)
            }
            RunEvent::TestStart { name } => {
                if !self.filter.matches(&name) {
                    debug!(test = %name, "skipping unselected test");
                    self.skipped.insert(name);
                    return Ok(());
                }
                self.handler.on_test_start(&name)
            }
            RunEvent::TestDone {
                name,
                assertions,
                duration_ms,
            } => {
                if self.skipped.remove(&name) || !self.filter.matches(&name) {
                    return Ok(());
                }
                let mut list = AssertionList::from_vec(assertions, duration_ms.unwrap_or(0));
                self.handler.on_test_done(&name, &mut list)?;
                self.module.append(list);
                Ok(())
            }
            RunEvent::ModuleDone { name, duration_ms } => {
                self.open_module = None;
                self.close_module(&name, duration_ms)
            }
            RunEvent::Done if self.honor_done => {
                self.close_open_module()?;
                self.complete()
            }
            RunEvent::Done => {
                debug!("Ignoring completion event inside event log");
                Ok(())
            }
        }
    }

    /// Report the module's assertions and fold them into the run list
    fn close_module(&mut self, name: &str, duration_ms: Option<u64>) -> Result<()> {
        let mut module = mem::take(&mut self.module);
        module.duration_ms = duration_ms.unwrap_or_else(|| self.module_timer.elapsed_ms());
        self.handler.on_module_done(name, &module)?;

        self.run.duration_ms += module.duration_ms;
        self.run.append(module);
        Ok(())
    }

    /// Close a module whose `module_done` never arrived
    fn close_open_module(&mut self) -> Result<()> {
        match self.open_module.take() {
            Some(name) => {
                debug!(module = %name, "module ended without module_done");
                self.close_module(&name, None)
            }
            None => Ok(()),
        }
    }

    fn complete(&mut self) -> Result<()> {
        self.done = true;
        self.handler.on_done(&self.run)
    }

    /// Fire completion if the stream never did
    fn finish(mut self) -> Result<()> {
        if self.done {
            return Ok(());
        }
        self.close_open_module()?;
        self.complete()
    }
}
