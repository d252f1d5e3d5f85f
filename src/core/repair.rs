//! Full repair pipeline: stop stale processes, clear build output, package
//! with a single fallback retry, launch the packaged artifact, and watch for
//! the readiness sentinel. Every step appends to a timestamped log.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::monitor::{watch_startup, MonitorOutcome, RepairLog};
use crate::process::{execute_local_command, run_program, spawn_monitored_command};

#[derive(Debug, Clone)]
pub struct RepairSpec {
    /// Project directory the build runs in.
    pub dir: PathBuf,
    /// Process name to kill before rebuilding (e.g. `java`). None skips.
    pub kill_image: Option<String>,
    /// Build output directory to delete (relative to `dir`). None skips.
    pub clean_dir: Option<String>,
    /// Primary build command.
    pub build_command: String,
    /// Alternate build invocation tried once if the primary fails.
    pub fallback_build_command: Option<String>,
    /// Artifact expected after a successful build (relative to `dir`).
    pub artifact: Option<String>,
    /// Launch command for the packaged artifact.
    pub run_command: String,
    pub sentinel: String,
    pub log_path: PathBuf,
    pub monitor_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step: String,
    pub detail: String,
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairOutput {
    pub steps: Vec<StepReport>,
    pub build_exit_code: i32,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorOutcome>,
    pub log_path: String,
}

pub fn run(spec: &RepairSpec) -> Result<RepairOutput> {
    if !spec.dir.is_dir() {
        return Err(Error::path_not_found(
            spec.dir.display().to_string(),
            Some("project directory".to_string()),
        ));
    }

    let log_path = if spec.log_path.is_absolute() {
        spec.log_path.clone()
    } else {
        spec.dir.join(&spec.log_path)
    };
    let mut log = RepairLog::create(&log_path)?;
    log.section("Repair start");

    let mut steps = Vec::new();

    // 1. Stop stale processes. Failure is expected when nothing is running.
    if let Some(image) = &spec.kill_image {
        crate::log_status!("repair", "Stopping {} processes", image);
        log.line(&format!("Killing {} processes...", image));
        let out = run_program("pkill", &["-f", image], None);
        steps.push(StepReport {
            step: "kill".to_string(),
            detail: image.clone(),
            ok: true,
        });
        log.line(&format!("pkill exit: {}", out.exit_code));
    }

    // 2. Delete build output. A missing directory is a skip, not a failure.
    if let Some(clean) = &spec.clean_dir {
        let target = crate::paths::join_relative(&spec.dir, clean);
        if target.is_dir() {
            log.line(&format!("Deleting {}...", target.display()));
            match std::fs::remove_dir_all(&target) {
                Ok(()) => steps.push(StepReport {
                    step: "clean".to_string(),
                    detail: target.display().to_string(),
                    ok: true,
                }),
                Err(e) => {
                    log.line(&format!("[WARN] Failed to delete {}: {}", target.display(), e));
                    steps.push(StepReport {
                        step: "clean".to_string(),
                        detail: e.to_string(),
                        ok: false,
                    });
                }
            }
        } else {
            log.line(&format!("{} not present, skipping clean", target.display()));
            steps.push(StepReport {
                step: "clean".to_string(),
                detail: "not present".to_string(),
                ok: true,
            });
        }
    }

    // 3. Build, with one fallback retry.
    crate::log_status!("repair", "Building: {}", spec.build_command);
    log.section(&format!("BUILD: {}", spec.build_command));
    let mut build = execute_local_command(&spec.build_command, Some(&spec.dir));
    log.command_output(&build);

    let mut used_fallback = false;
    if !build.success {
        if let Some(fallback) = &spec.fallback_build_command {
            crate::log_status!("repair", "Build failed, retrying with {}", fallback);
            log.line(&format!("[RETRY] Build failed. Trying '{}'...", fallback));
            log.section(&format!("BUILD (fallback): {}", fallback));
            build = execute_local_command(fallback, Some(&spec.dir));
            log.command_output(&build);
            used_fallback = true;
        }
    }

    if !build.success {
        log.line("[FATAL] Build failed again. Stop.");
        steps.push(StepReport {
            step: "build".to_string(),
            detail: format!("exit {}", build.exit_code),
            ok: false,
        });
        return Err(Error::build_command_failed(
            crate::error::BuildCommandFailedDetails {
                command: spec.build_command.clone(),
                exit_code: build.exit_code,
                fallback_command: spec.fallback_build_command.clone(),
                log_path: Some(log_path.display().to_string()),
            },
        )
        .with_hint("See the log file for the full build output"));
    }
    steps.push(StepReport {
        step: "build".to_string(),
        detail: format!("exit {}", build.exit_code),
        ok: true,
    });

    // 4. Check the artifact exists before launching.
    if let Some(artifact) = &spec.artifact {
        let artifact_path = crate::paths::join_relative(&spec.dir, artifact);
        if !artifact_path.is_file() {
            log.line(&format!("[ERROR] Artifact not found at {}", artifact_path.display()));
            steps.push(StepReport {
                step: "artifact".to_string(),
                detail: artifact_path.display().to_string(),
                ok: false,
            });
            // Reported and the launch step skipped, per the per-step error policy.
            return Ok(RepairOutput {
                steps,
                build_exit_code: build.exit_code,
                used_fallback,
                monitor: None,
                log_path: log_path.display().to_string(),
            });
        }
        steps.push(StepReport {
            step: "artifact".to_string(),
            detail: artifact_path.display().to_string(),
            ok: true,
        });
    }

    // 5. Launch and monitor.
    crate::log_status!("repair", "Launching: {}", spec.run_command);
    log.section(&format!("RUN: {}", spec.run_command));
    let mut child = spawn_monitored_command(&spec.run_command, &spec.dir)
        .map_err(|e| Error::process_spawn_failed(&spec.run_command, e.to_string()))?;

    let monitor = watch_startup(
        &mut child,
        &spec.sentinel,
        Duration::from_secs(spec.monitor_secs),
        &mut log,
    )?;

    steps.push(StepReport {
        step: "run".to_string(),
        detail: if monitor.sentinel_seen {
            "started".to_string()
        } else {
            "monitoring stopped".to_string()
        },
        ok: monitor.sentinel_seen,
    });

    Ok(RepairOutput {
        steps,
        build_exit_code: build.exit_code,
        used_fallback,
        monitor: Some(monitor),
        log_path: log_path.display().to_string(),
    })
}
