//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: Extract keys and write resource files
//! - `check`: Report resource files that a scan would create or change
//! - `init`: Write a default `.harvestrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "harvest", author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// The requested command, or `None` after printing help.
    pub fn into_command_or_help(self) -> Option<Command> {
        if self.command.is_none() {
            Self::command().print_help().ok();
        }
        self.command
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `scan` and `check`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Config file to use instead of searching for .harvestrc.json
    #[arg(long, env = "HARVEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Directory resource paths are resolved against (overrides config file)
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Sort keys in the written resource files
    #[arg(long)]
    pub sort: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would be written without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translation keys and write resource files
    Scan(ScanCommand),
    /// Fail if any resource file is missing or out of date
    Check(CheckCommand),
    /// Initialize a new .harvestrc.json configuration file
    Init,
}
