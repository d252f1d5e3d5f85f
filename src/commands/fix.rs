use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use srcmend::normalize::{self, NormalizeResult};
use srcmend::rewrite::{self, RewriteResult};
use srcmend::{ruleset, Error};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct FixArgs {
    /// JSON rule-set file driving the whole pass
    #[arg(long)]
    pub rules_file: String,

    /// Override the rule set's root directory
    #[arg(long)]
    pub path: Option<String>,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    pub write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum FixOutput {
    #[serde(rename = "fix")]
    #[serde(rename_all = "camelCase")]
    Fix {
        root: String,
        normalized: Vec<NormalizeResult>,
        rewrite: RewriteResult,
        dry_run: bool,
    },
}

/// Combined pass: normalize the configured directories first, then run the
/// rewrite over the whole root, exactly the shape of the original one-shot
/// fix scripts but driven by the rule-set file.
pub fn run(args: FixArgs) -> CmdResult<FixOutput> {
    let rules_path = srcmend::paths::require_file(&args.rules_file)?;
    let set = ruleset::load(&rules_path)?;

    let root = match args.path.as_deref().or(set.root.as_deref()) {
        Some(r) => resolve_root(&rules_path, r),
        None => {
            return Err(Error::validation_invalid_argument(
                "path",
                "rule set has no root and no --path was given",
            ))
        }
    };
    if !root.is_dir() {
        return Err(Error::path_not_found(
            root.display().to_string(),
            Some("directory".to_string()),
        ));
    }

    let rules = set.compile_rules()?;

    let mut normalized = Vec::new();
    for dir in &set.normalize_dirs {
        let parent = srcmend::paths::join_relative(&root, dir);
        if !parent.is_dir() {
            srcmend::log_status!("fix", "Skipping missing directory {}", parent.display());
            continue;
        }
        normalized.push(normalize::normalize_dirs(&parent, args.write)?);
    }

    let rewrite = rewrite::rewrite_tree(&root, &set.extensions, &rules, args.write)?;

    let clean = rewrite.skipped.is_empty() && normalized.iter().all(|n| n.skipped.is_empty());
    Ok((
        FixOutput::Fix {
            root: root.display().to_string(),
            normalized,
            rewrite,
            dry_run: !args.write,
        },
        if clean { 0 } else { 1 },
    ))
}

/// A relative root in the rule set resolves against the rule-set file's own
/// directory, so a rule set checked into a repo works from anywhere.
fn resolve_root(rules_path: &std::path::Path, root: &str) -> PathBuf {
    let expanded = srcmend::paths::expand(root);
    if expanded.is_absolute() {
        expanded
    } else {
        rules_path
            .parent()
            .map(|p| p.join(&expanded))
            .unwrap_or(expanded)
    }
}
