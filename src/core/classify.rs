//! Partitioning artifacts into language files, usage files and the rest.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::artifact::Artifact;
use crate::issues::OptimizeError;

/// `<lang>-po[-legacy][.<hash>].js`
static LANGUAGE_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-po(?:-legacy)?(?:\.[\w-]+)*\.js\z").unwrap());

/// Indices into the artifact list, by role.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    /// All language artifacts, including the reference.
    pub language: Vec<usize>,
    /// The artifact the index is built from. `None` only when there are no
    /// language artifacts at all.
    pub reference: Option<usize>,
    /// Text artifacts scanned for translation calls.
    pub usage: Vec<usize>,
    /// Everything left untouched (binary files, other extensions).
    pub passthrough: Vec<usize>,
}

impl Classification {
    /// A pass over this set has nothing to do.
    pub fn is_noop(&self) -> bool {
        self.language.is_empty()
    }
}

pub fn is_language_artifact(artifact: &Artifact) -> bool {
    LANGUAGE_ARTIFACT.is_match(artifact.basename())
}

/// Build the matcher for reference artifacts: the language code delimited by
/// a hyphen or dot (`en-po.js`, `app.en-po.js`, `i18n-en-po-legacy.js`).
pub fn reference_matcher(language: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"(?:\A|[-.]){}[-.]", regex::escape(language)))
        .case_insensitive(true)
        .build()
}

pub fn classify(
    artifacts: &[Artifact],
    reference_language: &str,
    usage_extensions: &[String],
) -> Result<Classification, OptimizeError> {
    let reference_pattern = reference_matcher(reference_language)?;
    let mut result = Classification::default();
    let mut reference_candidates: Vec<usize> = Vec::new();

    for (i, artifact) in artifacts.iter().enumerate() {
        if artifact.as_text().is_none() {
            result.passthrough.push(i);
        } else if is_language_artifact(artifact) {
            if reference_pattern.is_match(artifact.basename()) {
                reference_candidates.push(i);
            }
            result.language.push(i);
        } else if artifact
            .extension()
            .is_some_and(|ext| usage_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        {
            result.usage.push(i);
        } else {
            result.passthrough.push(i);
        }
    }

    if result.language.is_empty() {
        return Ok(result);
    }

    result.reference = reference_candidates
        .into_iter()
        .min_by(|&a, &b| artifacts[a].filename.cmp(&artifacts[b].filename));

    if result.reference.is_none() {
        let mut candidates: Vec<String> = result
            .language
            .iter()
            .map(|&i| artifacts[i].filename.clone())
            .collect();
        candidates.sort();
        return Err(OptimizeError::MissingReference {
            language: reference_language.to_string(),
            candidates,
        });
    }

    Ok(result)
}
