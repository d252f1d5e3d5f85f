use clap::Args;
use serde::Serialize;

use srcmend::restore::{self, RestoreResult};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RestoreArgs {
    /// Repository directory
    #[arg(long)]
    pub dir: String,

    /// Files to restore from HEAD
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RestoreOutput {
    #[serde(rename = "restore")]
    Restore(RestoreResult),
}

pub fn run(args: RestoreArgs) -> CmdResult<RestoreOutput> {
    let repo = srcmend::paths::require_dir(&args.dir)?;

    let result = restore::restore_files(&repo, &args.files)?;
    let exit_code = if result.restored == result.outcomes.len() {
        0
    } else {
        1
    };
    Ok((RestoreOutput::Restore(result), exit_code))
}
