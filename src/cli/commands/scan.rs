use anyhow::Result;
use tracing::debug;

use super::super::{
    args::ScanCommand,
    exit_status::ExitStatus,
    report::{ReportMode, print_outcome},
};
use super::Session;
use crate::pipeline::{scan as scan_sources, write_artifacts};

pub fn scan(cmd: ScanCommand) -> Result<ExitStatus> {
    let session = Session::load(&cmd.common)?;
    debug!(
        source_root = %session.roots.source_root.display(),
        output_root = %session.roots.output_root.display(),
        "starting scan"
    );

    let mut outcome = scan_sources(&session.config, &session.roots)?;
    let mode = if cmd.dry_run {
        ReportMode::DryRun
    } else {
        write_artifacts(&mut outcome.artifacts)?;
        ReportMode::Write
    };

    print_outcome(&outcome, mode, cmd.common.verbose, &session.display_root);
    Ok(ExitStatus::Success)
}
