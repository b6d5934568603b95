use std::process::ExitCode;

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{check::check, init::init, scan::scan},
    exit_status::ExitStatus,
};

/// Main entry point for the harvest CLI.
///
/// Dispatches to the command handler and maps its status to an exit code.
/// Errors are returned to the caller, which reports them and exits with
/// [`ExitStatus::Error`].
pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let Some(command) = args.into_command_or_help() else {
        return Ok(ExitStatus::Success.into());
    };

    let status = match command {
        Command::Scan(cmd) => scan(cmd)?,
        Command::Check(cmd) => check(cmd)?,
        Command::Init => init()?,
    };
    Ok(status.into())
}
