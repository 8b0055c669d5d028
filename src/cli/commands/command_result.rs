use std::path::PathBuf;

use super::super::exit_status::ExitStatus;
use crate::core::{ArtifactRole, Diagnostics, PassStats};

#[derive(Debug)]
pub enum CommandSummary {
    Optimize(OptimizeSummary),
    Init(InitSummary),
}

/// One rewritten (or to-be-rewritten) file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub filename: String,
    pub role: ArtifactRole,
    pub edit_count: usize,
}

#[derive(Debug)]
pub struct OptimizeSummary {
    pub dist_root: PathBuf,
    pub is_apply: bool,
    /// Files read from the dist root.
    pub artifact_count: usize,
    pub reference: Option<String>,
    pub key_count: usize,
    pub changes: Vec<FileChange>,
    pub stats: PassStats,
    pub diagnostics: Diagnostics,
    pub warning: Option<String>,
    pub maps_written: usize,
    pub index_path: Option<PathBuf>,
    pub skipped_count: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running keyshrink commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub warning_count: usize,
    /// If true, exit with status 1 when warning_count > 0.
    pub exit_on_warnings: bool,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.exit_on_warnings && self.warning_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
