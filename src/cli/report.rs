//! Report formatting and printing utilities.
//!
//! Separate from the engine so keyshrink can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, FileChange, InitSummary, OptimizeSummary};
use crate::{config::CONFIG_FILE_NAME, core::ArtifactRole};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of files listed before collapsing the rest.
const MAX_FILES_DISPLAY: usize = 20;

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Optimize(summary) => {
            print_optimize_to(summary, verbose, &mut io::stdout().lock());
            if let Some(warning) = &summary.warning {
                print_warning_to(warning, &mut io::stderr().lock());
            }
            if result.exit_on_warnings && result.warning_count > 0 {
                print_denied_to(result.warning_count, &mut io::stderr().lock());
            }
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

pub fn print_optimize_to<W: Write>(summary: &OptimizeSummary, verbose: bool, writer: &mut W) {
    let Some(reference) = &summary.reference else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} - no language files, nothing to optimize",
                summary.artifact_count,
                plural(summary.artifact_count, "file", "files")
            )
            .green()
        );
        return;
    };

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Indexed {} {} from {}",
            summary.key_count,
            plural(summary.key_count, "key", "keys"),
            reference
        )
        .green()
    );

    if !summary.changes.is_empty() {
        let verb = if summary.is_apply {
            "Rewrote".green().bold()
        } else {
            "Would rewrite".yellow().bold()
        };
        let _ = writeln!(
            writer,
            "{} {} file(s) in {}:",
            verb,
            summary.changes.len(),
            summary.dist_root.display()
        );
        print_changes(&summary.changes, verbose, writer);

        let stats = &summary.stats;
        let _ = writeln!(
            writer,
            "  = {} usage(s) rewritten, {} fallback entr{} inserted, {} empty value(s) filled",
            stats.rewritten_usages,
            stats.inserted_entries,
            if stats.inserted_entries == 1 { "y" } else { "ies" },
            stats.filled_values
        );
    }

    if summary.maps_written > 0 {
        let _ = writeln!(
            writer,
            "{} {} position map(s)",
            "Wrote".green().bold(),
            summary.maps_written
        );
    }
    if let Some(index_path) = &summary.index_path {
        let _ = writeln!(
            writer,
            "{} key index to {}",
            "Wrote".green().bold(),
            index_path.display()
        );
    }

    if !summary.is_apply && !summary.changes.is_empty() {
        let _ = writeln!(
            writer,
            "Run with {} to write these changes.",
            "--apply".cyan()
        );
    }
}

fn print_changes<W: Write>(changes: &[FileChange], verbose: bool, writer: &mut W) {
    let limit = if verbose {
        changes.len()
    } else {
        MAX_FILES_DISPLAY
    };
    for change in changes.iter().take(limit) {
        let count = match change.role {
            ArtifactRole::SourceMap => format!(
                "{} {} moved",
                change.edit_count,
                plural(change.edit_count, "mapping", "mappings")
            ),
            _ => format!(
                "{} {}",
                change.edit_count,
                plural(change.edit_count, "edit", "edits")
            ),
        };
        let _ = writeln!(
            writer,
            "  - {} {}",
            change.filename,
            format!("({}, {})", change.role, count).dimmed()
        );
    }
    if changes.len() > limit {
        let _ = writeln!(
            writer,
            "  ... and {} more (use {} to list all)",
            changes.len() - limit,
            "-v".cyan()
        );
    }
}

/// Print the pass's combined warning in cargo style.
pub fn print_warning_to<W: Write>(warning: &str, writer: &mut W) {
    let mut lines = warning.lines();
    if let Some(first) = lines.next() {
        let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), first);
    }
    for line in lines {
        let _ = writeln!(writer, "  {} {}", "=".blue(), line);
    }
}

fn print_denied_to<W: Write>(count: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "\n{} {} translation {} out of sync ({} is set)",
        FAILURE_MARK.red(),
        count,
        plural(count, "key", "keys"),
        "--deny-warnings".cyan()
    );
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
