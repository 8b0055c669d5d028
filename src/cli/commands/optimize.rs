use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use super::super::args::OptimizeCommand;
use super::{CommandResult, CommandSummary, FileChange, OptimizeSummary};
use crate::{
    config::{CONFIG_FILE_NAME, load_config},
    core::{
        self, ArtifactRewrite, ArtifactRole, LineMapping, PositionMap,
        edit::MappedSegment,
        file_scanner::{scan_artifacts, write_artifact},
    },
};

pub const MAP_FILE_SUFFIX: &str = ".keyshrink-map.json";

/// On-disk form of a rewritten artifact's position map.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PositionMapFile<'a> {
    file: &'a str,
    role: ArtifactRole,
    segments: &'a [MappedSegment],
    mappings: Vec<LineMapping>,
}

pub fn optimize(cmd: OptimizeCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let verbose = args.verbose;

    let config_result = load_config(&args.path)?;
    if verbose && !config_result.from_file {
        eprintln!(
            "Note: No {} found, using default configuration",
            CONFIG_FILE_NAME
        );
    }

    // CLI > config file > defaults
    let mut config = config_result.config;
    if let Some(language) = args.reference_language {
        config.reference_language = language;
        config.validate()?;
    }
    let dist_root = match args.dist_root {
        Some(dist_root) => dist_root,
        None => resolve_dist_root(&config_result.base_dir, &config.dist_root),
    };
    if !dist_root.is_dir() {
        bail!("Build output directory not found: {}", dist_root.display());
    }

    let scan = scan_artifacts(&dist_root, &config.ignores, verbose)?;
    if scan.skipped_count > 0 {
        eprintln!(
            "Warning: {} path(s) skipped due to access errors{}",
            scan.skipped_count,
            if verbose { "" } else { " (use -v for details)" }
        );
    }

    let artifact_count = scan.artifacts.len();
    let output = core::optimize(scan.artifacts, &config.pass_options(verbose))?;

    let changes: Vec<FileChange> = output
        .rewritten()
        .map(|(artifact, rewrite)| FileChange {
            filename: artifact.filename.clone(),
            role: rewrite.role,
            edit_count: rewrite.edit_count,
        })
        .collect();

    let mut maps_written = 0;
    if args.apply {
        for (artifact, rewrite) in output.rewritten() {
            write_artifact(&dist_root, artifact)?;
            if let (true, Some(map)) = (args.emit_maps, &rewrite.map) {
                write_position_map(&dist_root, &artifact.filename, artifact.bytes(), rewrite, map)?;
                maps_written += 1;
            }
        }
    }

    if let Some(index_path) = &args.emit_index {
        let mut json = serde_json::to_string_pretty(&output.index.to_json())
            .context("Failed to serialize key index")?;
        json.push('\n');
        fs::write(index_path, json)
            .with_context(|| format!("Failed to write {}", index_path.display()))?;
    }

    let warning_count = output.diagnostics.len();
    Ok(CommandResult {
        summary: CommandSummary::Optimize(OptimizeSummary {
            dist_root,
            is_apply: args.apply,
            artifact_count,
            reference: output.reference,
            key_count: output.index.len(),
            changes,
            stats: output.stats,
            diagnostics: output.diagnostics,
            warning: output.warning,
            maps_written,
            index_path: args.emit_index,
            skipped_count: scan.skipped_count,
        }),
        warning_count,
        exit_on_warnings: args.deny_warnings,
    })
}

/// Join a config-relative dist root onto the config directory, dropping `.`
/// components.
fn resolve_dist_root(base_dir: &Path, dist_root: &str) -> PathBuf {
    let joined: PathBuf = base_dir
        .join(dist_root)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if joined.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        joined
    }
}

pub fn map_filename(filename: &str) -> String {
    format!("{}{}", filename, MAP_FILE_SUFFIX)
}

fn write_position_map(
    dist_root: &Path,
    filename: &str,
    generated: &[u8],
    rewrite: &ArtifactRewrite,
    map: &PositionMap,
) -> Result<()> {
    let generated = String::from_utf8_lossy(generated);
    let file = PositionMapFile {
        file: filename,
        role: rewrite.role,
        segments: map.segments(),
        mappings: map.line_mappings(&generated, &rewrite.original),
    };
    let json = serde_json::to_string(&file).context("Failed to serialize position map")?;

    let path: PathBuf = dist_root.join(map_filename(filename));
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
}
