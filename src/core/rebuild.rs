//! Clean rebuild: run a build command, then launch the application and watch
//! its output for a readiness sentinel, logging everything to a file.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::monitor::{watch_startup, MonitorOutcome, RepairLog};
use crate::process::{execute_local_command, spawn_monitored_command};

#[derive(Debug, Clone)]
pub struct RebuildSpec {
    /// Project directory the commands run in.
    pub dir: PathBuf,
    /// Build command, e.g. `mvn clean compile`.
    pub build_command: String,
    /// Launch command, e.g. `mvn spring-boot:run`.
    pub run_command: String,
    /// Substring in the launch output meaning "application is up".
    pub sentinel: String,
    /// Log file path (relative paths resolve under `dir`).
    pub log_path: PathBuf,
    /// Courtesy stop for monitoring; the launched process is not killed.
    pub monitor_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildOutput {
    pub build_command: String,
    pub build_exit_code: i32,
    pub built: bool,
    pub run_command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorOutcome>,
    pub log_path: String,
}

pub fn run(spec: &RebuildSpec) -> Result<RebuildOutput> {
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

    log.section("Clean rebuild");
    crate::log_status!("rebuild", "Running build: {}", spec.build_command);
    log.section(&format!("BUILD: {}", spec.build_command));
    let build = execute_local_command(&spec.build_command, Some(&spec.dir));
    log.command_output(&build);

    if !build.success {
        crate::log_status!("rebuild", "Build failed (exit {})", build.exit_code);
        log.line("[FATAL] Build failed. Application not started.");
        return Ok(RebuildOutput {
            build_command: spec.build_command.clone(),
            build_exit_code: build.exit_code,
            built: false,
            run_command: spec.run_command.clone(),
            monitor: None,
            log_path: log_path.display().to_string(),
        });
    }

    crate::log_status!("rebuild", "Starting application: {}", spec.run_command);
    log.section(&format!("RUN: {}", spec.run_command));
    let mut child = spawn_monitored_command(&spec.run_command, &spec.dir)
        .map_err(|e| Error::process_spawn_failed(&spec.run_command, e.to_string()))?;

    let monitor = watch_startup(
        &mut child,
        &spec.sentinel,
        Duration::from_secs(spec.monitor_secs),
        &mut log,
    )?;

    if monitor.sentinel_seen {
        crate::log_status!("rebuild", "Application started");
    } else {
        crate::log_status!("rebuild", "Finished monitoring startup phase");
    }

    Ok(RebuildOutput {
        build_command: spec.build_command.clone(),
        build_exit_code: build.exit_code,
        built: true,
        run_command: spec.run_command.clone(),
        monitor: Some(monitor),
        log_path: log_path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec(dir: &std::path::Path, build: &str, run: &str) -> RebuildSpec {
        RebuildSpec {
            dir: dir.to_path_buf(),
            build_command: build.to_string(),
            run_command: run.to_string(),
            sentinel: "Started DemoApplication".to_string(),
            log_path: PathBuf::from("rebuild.log"),
            monitor_secs: 20,
        }
    }

    #[test]
    fn failed_build_skips_the_run_step() {
        let tmp = TempDir::new().unwrap();
        let out = run(&spec(tmp.path(), "exit 1", "echo should-not-run")).unwrap();

        assert!(!out.built);
        assert_eq!(out.build_exit_code, 1);
        assert!(out.monitor.is_none());
        let log = std::fs::read_to_string(tmp.path().join("rebuild.log")).unwrap();
        assert!(log.contains("[FATAL] Build failed"));
        assert!(!log.contains("should-not-run"));
    }

    #[test]
    fn successful_build_launches_and_sees_sentinel() {
        let tmp = TempDir::new().unwrap();
        let out = run(&spec(
            tmp.path(),
            "echo compiling",
            "echo 'Started DemoApplication in 2.2 seconds'",
        ))
        .unwrap();

        assert!(out.built);
        let monitor = out.monitor.unwrap();
        assert!(monitor.sentinel_seen);
        let log = std::fs::read_to_string(tmp.path().join("rebuild.log")).unwrap();
        assert!(log.contains("compiling"));
        assert!(log.contains("Started DemoApplication"));
    }

    #[test]
    fn missing_project_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let err = run(&spec(&missing, "true", "true")).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::PathNotFound);
    }
}
