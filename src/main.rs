use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tty;

use commands::{doctor, fix, normalize, rebuild, repair, restore, rewrite};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "srcmend")]
#[command(version = VERSION)]
#[command(about = "CLI for source tree repair and rebuild automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply ordered find/replace rules across files under a root
    Rewrite(rewrite::RewriteArgs),
    /// Lowercase the immediate subdirectories of a parent, merging on collision
    Normalize(normalize::NormalizeArgs),
    /// Normalize directories then rewrite files, driven by a rule-set file
    Fix(fix::FixArgs),
    /// Build, launch, and watch startup output for a readiness sentinel
    Rebuild(rebuild::RebuildArgs),
    /// Full repair pipeline: kill, clean, build with fallback, launch, monitor
    Repair(repair::RepairArgs),
    /// Restore files from git HEAD
    Restore(restore::RestoreArgs),
    /// Environment diagnostics: tool versions, processes, recent files
    Doctor(doctor::DoctorArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = commands::run_json(cli.command);
    output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
