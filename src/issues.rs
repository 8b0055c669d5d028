//! Errors that abort an optimization pass.
//!
//! Advisory findings (missing or unused translations) are not errors; they are
//! collected in [`crate::core::Diagnostics`] and never interrupt a pass.

use thiserror::Error;

/// Why a language artifact could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no known dictionary template matches")]
    NoTemplate,
    #[error("malformed dictionary at offset {offset}: expected {expected}")]
    Malformed {
        offset: usize,
        expected: &'static str,
    },
    #[error("unexpected text after dictionary at offset {offset}")]
    UnexpectedSuffix { offset: usize },
}

/// Why a source map could not be carried over to its rewritten artifact.
#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("{0}")]
    Decode(#[from] sourcemap::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal errors of one optimization pass. Nothing is written when one occurs.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("failed to parse language file '{filename}': {reason}")]
    Parse {
        filename: String,
        reason: ParseFailure,
    },
    #[error(
        "no reference language file for '{language}' among language files: {}",
        .candidates.join(", ")
    )]
    MissingReference {
        language: String,
        candidates: Vec<String>,
    },
    #[error("overlapping edits in '{filename}' at offset {offset}")]
    OverlappingEdits { filename: String, offset: usize },
    #[error("failed to update source map '{filename}': {reason}")]
    SourceMap {
        filename: String,
        reason: SourceMapError,
    },
    #[error("invalid translation function pattern")]
    UsagePattern(#[from] regex::Error),
}
