//! Local process execution primitives.

use serde::Serialize;
use std::path::Path;
use std::process::{Child, Command, Stdio};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
}

/// Execute a shell command and capture its output. Spawn failures are folded
/// into the output (exit code -1) rather than surfaced as errors; callers
/// inspect `success`.
pub fn execute_local_command(command: &str, dir: Option<&Path>) -> CommandOutput {
    let mut cmd = Command::new("/bin/bash");
    cmd.args(["-c", command]);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    match cmd.output() {
        Ok(out) => CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            success: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
        },
        Err(e) => CommandOutput {
            stdout: String::new(),
            stderr: format!("Command error: {}", e),
            success: false,
            exit_code: -1,
        },
    }
}

/// Spawn a shell command with piped stdout for line-by-line monitoring.
/// stderr is redirected into the same pipe so startup errors land in the log.
pub fn spawn_monitored_command(command: &str, dir: &Path) -> std::io::Result<Child> {
    // Subshell so the redirect covers compound commands.
    Command::new("/bin/bash")
        .args(["-c", &format!("({}) 2>&1", command)])
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
}

/// Run a program directly (no shell) and capture output.
pub fn run_program(program: &str, args: &[&str], dir: Option<&Path>) -> CommandOutput {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    match cmd.output() {
        Ok(out) => CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            success: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
        },
        Err(e) => CommandOutput {
            stdout: String::new(),
            stderr: format!("Command error: {}", e),
            success: false,
            exit_code: -1,
        },
    }
}
