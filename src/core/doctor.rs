//! Environment diagnostics: tool version probes, a process listing for a
//! named image, and recently-modified files in directories of interest.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::process::run_program;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolProbe {
    pub tool: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFile {
    pub path: String,
    pub modified: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryReport {
    pub dir: String,
    pub exists: bool,
    pub recent: Vec<RecentFile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReport {
    pub checked_at: String,
    pub tools: Vec<ToolProbe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<Vec<String>>,
    pub directories: Vec<DirectoryReport>,
}

/// Probe a tool for its version. Tools disagree on the flag (`git --version`,
/// `java -version`), so `--version` is tried first and `-version` second.
pub fn probe_tool(tool: &str) -> ToolProbe {
    for flag in ["--version", "-version"] {
        let out = run_program(tool, &[flag], None);
        if out.success {
            // java and mvn print version info to stderr
            let text = if out.stdout.trim().is_empty() {
                out.stderr
            } else {
                out.stdout
            };
            let version = text.lines().next().unwrap_or("").trim().to_string();
            return ToolProbe {
                tool: tool.to_string(),
                available: true,
                version: Some(version),
            };
        }
    }

    ToolProbe {
        tool: tool.to_string(),
        available: false,
        version: None,
    }
}

/// List running processes whose command line mentions `image`.
pub fn list_processes(image: &str) -> Vec<String> {
    let out = run_program("ps", &["-eo", "pid,etime,args"], None);
    if !out.success {
        return Vec::new();
    }
    out.stdout
        .lines()
        .skip(1)
        .filter(|line| line.contains(image) && !line.contains("ps -eo"))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Files directly under `dir` (one level, like the original report) modified
/// within `window`.
pub fn recent_files(dir: &Path, window: Duration) -> DirectoryReport {
    let report_dir = dir.display().to_string();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return DirectoryReport {
            dir: report_dir,
            exists: false,
            recent: Vec::new(),
        };
    };

    let now = SystemTime::now();
    let mut recent = Vec::new();
    for entry in entries.flatten() {
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = meta.modified() else {
            continue;
        };
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age <= window {
            let stamp: DateTime<Local> = modified.into();
            recent.push(RecentFile {
                path: entry.path().display().to_string(),
                modified: stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            });
        }
    }
    recent.sort_by(|a, b| a.path.cmp(&b.path));

    DirectoryReport {
        dir: report_dir,
        exists: true,
        recent,
    }
}

pub fn diagnose(
    tools: &[String],
    process_image: Option<&str>,
    dirs: &[std::path::PathBuf],
    window: Duration,
) -> DoctorReport {
    DoctorReport {
        checked_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        tools: tools.iter().map(|t| probe_tool(t)).collect(),
        processes: process_image.map(list_processes),
        directories: dirs.iter().map(|d| recent_files(d, window)).collect(),
    }
}
