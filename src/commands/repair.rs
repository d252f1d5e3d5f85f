use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use srcmend::repair::{self, RepairOutput, RepairSpec};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RepairArgs {
    /// Project directory the build runs in
    #[arg(long)]
    pub dir: String,

    /// Process name to kill before rebuilding (e.g. java)
    #[arg(long)]
    pub kill: Option<String>,

    /// Build output directory to delete before building (relative to --dir)
    #[arg(long)]
    pub clean: Option<String>,

    /// Primary build command
    #[arg(long, default_value = "mvn package -DskipTests")]
    pub build: String,

    /// Alternate build invocation tried once if the primary fails
    #[arg(long)]
    pub build_fallback: Option<String>,

    /// Artifact that must exist after the build (relative to --dir)
    #[arg(long)]
    pub artifact: Option<String>,

    /// Launch command for the packaged artifact
    #[arg(long)]
    pub run: String,

    /// Substring in the launch output meaning the application is up
    #[arg(long)]
    pub sentinel: String,

    /// Log file (relative paths resolve under --dir)
    #[arg(long, default_value = "repair.log")]
    pub log: String,

    /// Seconds to monitor startup before detaching
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RepairCmdOutput {
    #[serde(rename = "repair")]
    Repair(RepairOutput),
}

pub fn run(args: RepairArgs) -> CmdResult<RepairCmdOutput> {
    let dir = srcmend::paths::require_dir(&args.dir)?;

    let spec = RepairSpec {
        dir,
        kill_image: args.kill,
        clean_dir: args.clean,
        build_command: args.build,
        fallback_build_command: args.build_fallback,
        artifact: args.artifact,
        run_command: args.run,
        sentinel: args.sentinel,
        log_path: PathBuf::from(args.log),
        monitor_secs: args.timeout,
    };

    let output = repair::run(&spec)?;
    let exit_code = if output.steps.iter().all(|s| s.ok) { 0 } else { 1 };
    Ok((RepairCmdOutput::Repair(output), exit_code))
}
