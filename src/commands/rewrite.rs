use clap::Args;
use serde::Serialize;

use srcmend::rewrite::{self, FileEdit, FileSkip, RuleSummary};

use crate::commands::{collect_rules, CmdResult};

#[derive(Args)]
pub struct RewriteArgs {
    /// Root directory to walk
    #[arg(long)]
    pub path: String,

    /// File extension to include, without dot (repeatable; empty = all files)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Literal replacement rule FROM=TO (repeatable, applied in order)
    #[arg(long = "rule")]
    pub rules: Vec<String>,

    /// Case-insensitive replacement rule FROM=TO (repeatable, applied after --rule)
    #[arg(long = "irule")]
    pub irules: Vec<String>,

    /// JSON rule-set file; its rules apply before any --rule/--irule flags
    #[arg(long)]
    pub rules_file: Option<String>,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    pub write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RewriteOutput {
    #[serde(rename = "rewrite")]
    #[serde(rename_all = "camelCase")]
    Rewrite {
        root: String,
        rules: Vec<RuleSummary>,
        files_scanned: usize,
        edits: Vec<FileEdit>,
        skipped: Vec<FileSkip>,
        dry_run: bool,
        applied: bool,
    },
}

pub fn run(args: RewriteArgs) -> CmdResult<RewriteOutput> {
    let root = srcmend::paths::require_dir(&args.path)?;
    let rules = collect_rules(args.rules_file.as_deref(), &args.rules, &args.irules)?;

    srcmend::log_status!("rewrite", "Walking {} with {} rules", root.display(), rules.len());
    let result = rewrite::rewrite_tree(&root, &args.extensions, &rules, args.write)?;

    let exit_code = if result.skipped.is_empty() { 0 } else { 1 };
    Ok((
        RewriteOutput::Rewrite {
            root: root.display().to_string(),
            rules: result.rules,
            files_scanned: result.files_scanned,
            edits: result.edits,
            skipped: result.skipped,
            dry_run: !args.write,
            applied: result.applied,
        },
        exit_code,
    ))
}
