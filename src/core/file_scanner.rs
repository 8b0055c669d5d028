use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

use super::artifact::Artifact;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of reading a build output directory.
pub struct ScanResult {
    /// Every file under the root, sorted by filename.
    pub artifacts: Vec<Artifact>,
    pub skipped_count: usize,
}

/// Read every file under `root` as an artifact named by its `/`-separated
/// path relative to `root`.
///
/// Glob `ignores` are matched against that relative name; literal ones are
/// path prefixes.
pub fn scan_artifacts(root: &Path, ignores: &[String], verbose: bool) -> Result<ScanResult> {
    let mut artifacts = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(root.join(p));
        }
    }

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if literal_ignore_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            continue;
        }

        let filename = relative_name(root, path);
        if glob_patterns.iter().any(|p| p.matches(&filename)) {
            continue;
        }

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        artifacts.push(Artifact::from_bytes(filename, bytes));
    }

    artifacts.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(ScanResult {
        artifacts,
        skipped_count,
    })
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write `artifact` back under `root`.
pub fn write_artifact(root: &Path, artifact: &Artifact) -> Result<()> {
    let path = root.join(&artifact.filename);
    fs::write(&path, artifact.bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}
