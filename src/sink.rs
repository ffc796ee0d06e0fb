// sink.rs - Result stream consumer
// Purpose: Drain the scan's result groups to the console and, optionally,
//          an output file, counting findings along the way

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::warn;

use crate::results::ResultLine;
use crate::scanner::ResultGroup;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub exists: usize,
    pub listable: usize,
    pub objects: usize,
    pub errors: usize,
    pub unknown: usize,
}

impl ScanSummary {
    fn record(&mut self, line: &ResultLine) {
        match line {
            ResultLine::Exists { .. } => self.exists += 1,
            ResultLine::Listable { .. } => self.listable += 1,
            ResultLine::Object { .. } => self.objects += 1,
            ResultLine::Error { .. } => self.errors += 1,
            ResultLine::Unknown { .. } => self.unknown += 1,
        }
    }
}

pub struct ResultSink {
    file: Option<File>,
    progress: ProgressBar,
    /// Console target; `None` once silenced or after a failed write
    console: Option<Box<dyn Write + Send>>,
}

impl ResultSink {
    /// Create the sink, creating (truncating) `output` if given.
    pub fn new(output: Option<&Path>) -> Result<Self> {
        let file = match output {
            Some(path) => Some(
                File::create(path)
                    .with_context(|| format!("Could not create output file: {}", path.display()))?,
            ),
            None => None,
        };

        Ok(Self {
            file,
            progress: ProgressBar::hidden(),
            console: Some(Box::new(io::stdout())),
        })
    }

    /// Print through `progress` so the bar is redrawn below each line
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Disable console printing (file output and counting still happen)
    pub fn silent(mut self) -> Self {
        self.console = None;
        self
    }

    #[cfg(test)]
    fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Some(Box::new(console));
        self
    }

    /// Consume groups until every producer has dropped its sender.
    pub async fn drain(mut self, mut rx: mpsc::UnboundedReceiver<ResultGroup>) -> ScanSummary {
        let mut summary = ScanSummary::default();

        while let Some(group) = rx.recv().await {
            for line in &group {
                summary.record(line);
                self.emit(line);
            }
        }

        self.progress.finish_and_clear();
        summary
    }

    fn emit(&mut self, line: &ResultLine) {
        if let Some(console) = self.console.as_mut() {
            let rendered = line.colored();
            let written = self.progress.suspend(|| writeln!(console, "{}", rendered));
            if let Err(e) = written {
                // e.g. stdout piped into `head`; keep draining to the file
                warn!(error = %e, "console closed, no longer echoing results");
                self.console = None;
            }
        }

        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", line) {
                warn!(error = %e, "failed to write result line to output file");
            }
        }
    }
}
