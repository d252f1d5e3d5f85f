use clap::Args;
use serde::Serialize;

use srcmend::normalize::{self, DirRename, DirSkip};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Parent directory; its immediate subdirectories are lowercased
    #[arg(long)]
    pub path: String,

    /// Apply renames to disk (default is dry-run)
    #[arg(long)]
    pub write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum NormalizeOutput {
    #[serde(rename = "normalize")]
    #[serde(rename_all = "camelCase")]
    Normalize {
        parent: String,
        renames: Vec<DirRename>,
        skipped: Vec<DirSkip>,
        dry_run: bool,
        applied: bool,
    },
}

pub fn run(args: NormalizeArgs) -> CmdResult<NormalizeOutput> {
    let parent = srcmend::paths::require_dir(&args.path)?;

    srcmend::log_status!("normalize", "Normalizing directory case under {}", parent.display());
    let result = normalize::normalize_dirs(&parent, args.write)?;

    let exit_code = if result.skipped.is_empty() { 0 } else { 1 };
    Ok((
        NormalizeOutput::Normalize {
            parent: result.parent,
            renames: result.renames,
            skipped: result.skipped,
            dry_run: !args.write,
            applied: result.applied,
        },
        exit_code,
    ))
}
