use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use srcmend::rebuild::{self, RebuildOutput, RebuildSpec};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RebuildArgs {
    /// Project directory the commands run in
    #[arg(long)]
    pub dir: String,

    /// Build command
    #[arg(long, default_value = "mvn clean compile")]
    pub build: String,

    /// Launch command
    #[arg(long, default_value = "mvn spring-boot:run")]
    pub run: String,

    /// Substring in the launch output meaning the application is up
    #[arg(long)]
    pub sentinel: String,

    /// Log file (relative paths resolve under --dir)
    #[arg(long, default_value = "rebuild.log")]
    pub log: String,

    /// Seconds to monitor startup before detaching (the process keeps running)
    #[arg(long, default_value_t = 90)]
    pub timeout: u64,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RebuildCmdOutput {
    #[serde(rename = "rebuild")]
    Rebuild(RebuildOutput),
}

pub fn run(args: RebuildArgs) -> CmdResult<RebuildCmdOutput> {
    let dir = srcmend::paths::require_dir(&args.dir)?;

    let spec = RebuildSpec {
        dir,
        build_command: args.build,
        run_command: args.run,
        sentinel: args.sentinel,
        log_path: PathBuf::from(args.log),
        monitor_secs: args.timeout,
    };

    let output = rebuild::run(&spec)?;
    let exit_code = if output.built { 0 } else { 1 };
    Ok((RebuildCmdOutput::Rebuild(output), exit_code))
}
