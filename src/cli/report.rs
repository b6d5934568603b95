//! Report formatting and printing utilities.
//!
//! Kept apart from the pipeline so the library can be used without any
//! terminal output.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use crate::pipeline::{Artifact, ScanOutcome, WriteStatus};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Which command produced the outcome being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Files were written.
    Write,
    /// Nothing was written; statuses describe what a scan would do.
    DryRun,
    /// Only stale files matter.
    Check,
}

/// Print a scan outcome to stdout.
pub fn print_outcome(outcome: &ScanOutcome, mode: ReportMode, verbose: bool, display_root: &Path) {
    print_outcome_to(outcome, mode, verbose, display_root, &mut io::stdout().lock());
}

/// Print a scan outcome to a custom writer.
///
/// Unchanged files are listed only when `verbose` is set.
pub fn print_outcome_to<W: Write>(
    outcome: &ScanOutcome,
    mode: ReportMode,
    verbose: bool,
    display_root: &Path,
    writer: &mut W,
) {
    let rows: Vec<(WriteStatus, String, usize)> = outcome
        .artifacts
        .iter()
        .filter(|artifact| verbose || artifact.status != WriteStatus::Unchanged)
        .map(|artifact| {
            (
                artifact.status,
                display_path(&artifact.path, display_root),
                artifact.key_count,
            )
        })
        .collect();

    let label_width = rows
        .iter()
        .map(|(status, _, _)| UnicodeWidthStr::width(status_label(*status, mode)))
        .max()
        .unwrap_or(0);
    let path_width = rows
        .iter()
        .map(|(_, path, _)| UnicodeWidthStr::width(path.as_str()))
        .max()
        .unwrap_or(0);

    for (status, path, key_count) in &rows {
        let label = status_label(*status, mode);
        let label_padding = label_width - UnicodeWidthStr::width(label);
        let path_padding = path_width - UnicodeWidthStr::width(path.as_str());
        let _ = writeln!(
            writer,
            "  {}{}  {}{}  {}",
            paint(label, *status, mode),
            " ".repeat(label_padding),
            path,
            " ".repeat(path_padding),
            plural(*key_count, "key", "keys").dimmed()
        );
    }

    if !rows.is_empty() {
        let _ = writeln!(writer);
    }
    print_summary(outcome, mode, writer);
}

fn print_summary<W: Write>(outcome: &ScanOutcome, mode: ReportMode, writer: &mut W) {
    let count = |status: WriteStatus| count_status(&outcome.artifacts, status);
    let created = count(WriteStatus::Created);
    let updated = count(WriteStatus::Updated);
    let unchanged = count(WriteStatus::Unchanged);

    let mut scanned = format!("Scanned {}", plural(outcome.files_scanned, "source file", "source files"));
    if outcome.files_skipped > 0 {
        scanned.push_str(&format!(" ({} skipped)", outcome.files_skipped));
    }

    let message = match mode {
        ReportMode::Write => format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("{scanned}: {created} created, {updated} updated, {unchanged} unchanged").green()
        ),
        ReportMode::DryRun => format!(
            "{} {} {}",
            SUCCESS_MARK.green(),
            format!("{scanned}: {created} to create, {updated} to update, {unchanged} unchanged").green(),
            "(dry run)".dimmed()
        ),
        ReportMode::Check if created + updated == 0 => format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "{scanned}: {} up to date",
                plural(outcome.artifacts.len(), "resource file", "resource files")
            )
            .green()
        ),
        ReportMode::Check => format!(
            "{} {} of {} out of date (run {})",
            FAILURE_MARK.red(),
            created + updated,
            plural(outcome.artifacts.len(), "resource file", "resource files"),
            "harvest scan".cyan()
        ),
    };
    let _ = writeln!(writer, "{}", message);
}

fn status_label(status: WriteStatus, mode: ReportMode) -> &'static str {
    match (mode, status) {
        (_, WriteStatus::Unchanged) => status.as_str(),
        (ReportMode::Write, _) => status.as_str(),
        (ReportMode::DryRun, WriteStatus::Created) => "would create",
        (ReportMode::DryRun, WriteStatus::Updated) => "would update",
        (ReportMode::Check, WriteStatus::Created) => "missing",
        (ReportMode::Check, WriteStatus::Updated) => "stale",
    }
}

fn paint(label: &str, status: WriteStatus, mode: ReportMode) -> ColoredString {
    match (mode, status) {
        (_, WriteStatus::Unchanged) => label.dimmed(),
        (ReportMode::Check, _) => label.bold().red(),
        (_, WriteStatus::Created) => label.green(),
        (_, WriteStatus::Updated) => label.yellow(),
    }
}

fn count_status(artifacts: &[Artifact], status: WriteStatus) -> usize {
    artifacts
        .iter()
        .filter(|artifact| artifact.status == status)
        .count()
}

fn display_path(path: &Path, display_root: &Path) -> String {
    path.strip_prefix(display_root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
