//! Restore files from git HEAD, one `git checkout` per file, reporting a
//! per-file outcome and whether the file exists afterwards.

use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::process::run_program;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOutcome {
    pub file: String,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    /// Whether the file exists after the checkout attempt.
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResult {
    pub repo: String,
    pub outcomes: Vec<RestoreOutcome>,
    pub restored: usize,
}

/// Run `git checkout HEAD -- <file>` for each file. Per-file failures are
/// outcomes, not errors; the repo itself not being a git checkout is fatal.
pub fn restore_files(repo: &Path, files: &[String]) -> Result<RestoreResult> {
    if !repo.is_dir() {
        return Err(Error::path_not_found(
            repo.display().to_string(),
            Some("repository".to_string()),
        ));
    }

    let inside = run_program("git", &["rev-parse", "--is-inside-work-tree"], Some(repo));
    if !inside.success {
        return Err(
            Error::git_command_failed(format!("{} is not a git work tree", repo.display()))
                .with_hint("Pass the repository root with --dir"),
        );
    }

    let mut outcomes = Vec::new();
    for file in files {
        crate::log_status!("restore", "git checkout HEAD -- {}", file);
        let out = run_program("git", &["checkout", "HEAD", "--", file], Some(repo));
        outcomes.push(RestoreOutcome {
            file: file.clone(),
            exit_code: out.exit_code,
            stderr: out.stderr.trim().to_string(),
            exists: repo.join(file).exists(),
        });
    }

    let restored = outcomes.iter().filter(|o| o.exists).count();
    Ok(RestoreResult {
        repo: repo.display().to_string(),
        outcomes,
        restored,
    })
}
