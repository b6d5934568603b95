mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, CheckCommand, Command, CommonArgs, ScanCommand};
pub use exit_status::ExitStatus;
pub use report::{FAILURE_MARK, ReportMode, SUCCESS_MARK, print_outcome, print_outcome_to};
pub use run::run_cli;
