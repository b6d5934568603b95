use anyhow::Result;

use super::super::{
    args::CheckCommand,
    exit_status::ExitStatus,
    report::{ReportMode, print_outcome},
};
use super::Session;
use crate::pipeline::scan;

/// Compute resource files as `scan` would and fail if any differ from disk.
pub fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let session = Session::load(&cmd.common)?;
    let outcome = scan(&session.config, &session.roots)?;

    print_outcome(&outcome, ReportMode::Check, cmd.common.verbose, &session.display_root);

    if outcome.stale().next().is_some() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
