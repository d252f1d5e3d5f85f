//! Startup monitoring — stream a spawned process's output into a log file
//! and watch for a sentinel substring.
//!
//! The deadline is a courtesy stop for *monitoring only*: when it elapses the
//! reader stops, the log is closed, and the child keeps running detached.

use chrono::Local;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::Child;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::process::CommandOutput;

/// Plain-text log file with timestamped section headers, flushed per line so
/// a crash mid-run still leaves everything written so far on disk.
pub struct RepairLog {
    file: File,
}

impl RepairLog {
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("create log {}", path.display())))
            })?;
        Ok(Self { file })
    }

    pub fn section(&mut self, title: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(self.file, "--- {} [{}] ---", title, stamp);
        let _ = self.file.flush();
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.file, "{}", text);
        let _ = self.file.flush();
    }

    /// Record a captured command's streams and exit code.
    pub fn command_output(&mut self, output: &CommandOutput) {
        if !output.stdout.is_empty() {
            self.line(output.stdout.trim_end());
        }
        if !output.stderr.is_empty() {
            self.line("--- stderr ---");
            self.line(output.stderr.trim_end());
        }
        self.line(&format!("Return code: {}", output.exit_code));
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOutcome {
    /// True when the sentinel substring appeared in the output.
    pub sentinel_seen: bool,
    pub lines_logged: usize,
    pub elapsed_secs: u64,
    /// True when monitoring stopped with the child still running.
    pub detached: bool,
}

/// Read the child's stdout line by line into `log` until the sentinel
/// appears, the stream ends, or `deadline` elapses. Reads are blocking; the
/// deadline is checked between lines. The child is never killed or waited on
/// here — on every exit path it is left to continue in the background.
pub fn watch_startup(
    child: &mut Child,
    sentinel: &str,
    deadline: Duration,
    log: &mut RepairLog,
) -> Result<MonitorOutcome> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::internal_io("child has no piped stdout", None))?;
    let mut reader = BufReader::new(stdout);

    let start = Instant::now();
    let mut lines_logged = 0;
    let mut sentinel_seen = false;
    let mut stream_ended = false;

    loop {
        if start.elapsed() >= deadline {
            break;
        }
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                stream_ended = true;
                break;
            }
            Ok(_) => {
                log.line(line.trim_end());
                lines_logged += 1;
                if line.contains(sentinel) {
                    sentinel_seen = true;
                    log.line(&format!("[SUCCESS] Sentinel detected: {}", sentinel));
                    break;
                }
            }
            Err(e) => {
                log.line(&format!("[WARN] Read error while monitoring: {}", e));
                break;
            }
        }
    }

    if !sentinel_seen && !stream_ended {
        log.line("[INFO] Monitoring stopped; process left running in background");
    }

    Ok(MonitorOutcome {
        sentinel_seen,
        lines_logged,
        elapsed_secs: start.elapsed().as_secs(),
        detached: !stream_ended,
    })
}
