use clap::Args;
use serde::Serialize;
use std::time::Duration;

use srcmend::doctor::{self, DoctorReport};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct DoctorArgs {
    /// Tool to probe for a version (repeatable)
    #[arg(long = "tool", default_values_t = [String::from("git")])]
    pub tools: Vec<String>,

    /// List running processes whose command line mentions this name
    #[arg(long)]
    pub process: Option<String>,

    /// Directory to scan for recently modified files (repeatable)
    #[arg(long = "dir")]
    pub dirs: Vec<String>,

    /// Recency window in seconds for the directory scan
    #[arg(long, default_value_t = 3600)]
    pub window: u64,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum DoctorOutput {
    #[serde(rename = "doctor")]
    Doctor(DoctorReport),
}

pub fn run(args: DoctorArgs) -> CmdResult<DoctorOutput> {
    let dirs: Vec<_> = args.dirs.iter().map(|d| srcmend::paths::expand(d)).collect();

    let report = doctor::diagnose(
        &args.tools,
        args.process.as_deref(),
        &dirs,
        Duration::from_secs(args.window),
    );

    let exit_code = if report.tools.iter().all(|t| t.available) {
        0
    } else {
        1
    };
    Ok((DoctorOutput::Doctor(report), exit_code))
}
