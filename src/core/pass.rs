//! One optimization pass over a complete artifact set.
//!
//! The reference artifact is parsed and indexed before anything is rewritten.
//! Every language artifact is parsed before any edit is applied, so a parse
//! failure leaves the whole set untouched. Source maps of rewritten artifacts
//! are regenerated as part of the pass.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use serde::Serialize;

use super::{
    artifact::Artifact,
    classify::{Classification, classify},
    diagnostics::Diagnostics,
    edit::{EditSet, PositionMap},
    index::{ReferenceIndex, TranslationKeyIndex, build_index},
    parse::parse_language_artifact,
    rewrite::{UsageMatcher, rewrite_dictionary, rewrite_usages},
    source_map::{remap_source_map, source_map_filename},
};
use crate::issues::OptimizeError;

#[derive(Debug, Clone)]
pub struct PassOptions {
    pub reference_language: String,
    pub translation_functions: Vec<String>,
    /// Extensions of artifacts scanned for translation calls.
    pub usage_extensions: Vec<String>,
    /// Print per-artifact notes to stderr.
    pub verbose: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            reference_language: "en".to_string(),
            translation_functions: ["$t", "$tc", "$te"].map(String::from).to_vec(),
            usage_extensions: ["js", "mjs", "cjs"].map(String::from).to_vec(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactRole {
    /// The language artifact the index was built from.
    Reference,
    Language,
    Usage,
    /// Source map of a rewritten artifact.
    SourceMap,
}

impl std::fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactRole::Reference => "reference",
            ArtifactRole::Language => "language",
            ArtifactRole::Usage => "usage",
            ArtifactRole::SourceMap => "source-map",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactRewrite {
    pub role: ArtifactRole,
    /// Edits applied, or mappings moved for a source map.
    pub edit_count: usize,
    /// Text before rewriting, for line/column mappings.
    pub original: String,
    /// `None` for regenerated source maps.
    pub map: Option<PositionMap>,
}

#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub artifact: Artifact,
    /// `None` when the artifact passed through byte-identical.
    pub rewrite: Option<ArtifactRewrite>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassStats {
    pub language_artifacts: usize,
    pub usage_artifacts: usize,
    /// Usage sites whose key was replaced by an ordinal.
    pub rewritten_usages: usize,
    pub inserted_entries: usize,
    pub filled_values: usize,
}

#[derive(Debug, Clone)]
pub struct PassOutput {
    /// Every input artifact, in input order.
    pub artifacts: Vec<OutputArtifact>,
    /// Filename of the reference artifact, if there were language artifacts.
    pub reference: Option<String>,
    pub index: TranslationKeyIndex,
    pub diagnostics: Diagnostics,
    pub warning: Option<String>,
    pub stats: PassStats,
}

impl PassOutput {
    fn unchanged(artifacts: Vec<Artifact>) -> Self {
        Self {
            artifacts: artifacts
                .into_iter()
                .map(|artifact| OutputArtifact {
                    artifact,
                    rewrite: None,
                })
                .collect(),
            reference: None,
            index: TranslationKeyIndex::default(),
            diagnostics: Diagnostics::default(),
            warning: None,
            stats: PassStats::default(),
        }
    }

    pub fn rewritten(&self) -> impl Iterator<Item = (&Artifact, &ArtifactRewrite)> {
        self.artifacts
            .iter()
            .filter_map(|out| out.rewrite.as_ref().map(|rewrite| (&out.artifact, rewrite)))
    }
}

/// Edits computed for each artifact, by artifact position.
struct Plan {
    edits: Vec<Option<(ArtifactRole, EditSet)>>,
    index: ReferenceIndex,
    diagnostics: Diagnostics,
    stats: PassStats,
}

pub fn optimize(artifacts: Vec<Artifact>, options: &PassOptions) -> Result<PassOutput, OptimizeError> {
    let classification = classify(
        &artifacts,
        &options.reference_language,
        &options.usage_extensions,
    )?;

    let Some(reference) = classification.reference else {
        if options.verbose {
            eprintln!("Note: No language files found, nothing to optimize");
        }
        return Ok(PassOutput::unchanged(artifacts));
    };
    let reference_name = artifacts[reference].filename.clone();

    let plan = plan_edits(&artifacts, &classification, reference, options)?;

    let mut output = Vec::with_capacity(artifacts.len());
    for (artifact, planned) in artifacts.into_iter().zip(plan.edits) {
        let Some((role, edits)) = planned.filter(|(_, edits)| !edits.is_empty()) else {
            output.push(OutputArtifact {
                artifact,
                rewrite: None,
            });
            continue;
        };

        let original = artifact.as_text().unwrap_or_default().to_string();
        let edit_count = edits.len();
        let rewrite = edits
            .apply(&original)
            .map_err(|overlap| OptimizeError::OverlappingEdits {
                filename: artifact.filename.clone(),
                offset: overlap.offset,
            })?;

        output.push(OutputArtifact {
            artifact: Artifact::text(artifact.filename, rewrite.text),
            rewrite: Some(ArtifactRewrite {
                role,
                edit_count,
                original,
                map: Some(rewrite.map),
            }),
        });
    }

    carry_source_maps(&mut output, options.verbose)?;

    Ok(PassOutput {
        artifacts: output,
        reference: Some(reference_name),
        index: plan.index.keys,
        warning: plan.diagnostics.warning(),
        diagnostics: plan.diagnostics,
        stats: plan.stats,
    })
}

/// Regenerate the source map of every rewritten artifact that has one in the
/// set.
fn carry_source_maps(output: &mut [OutputArtifact], verbose: bool) -> Result<(), OptimizeError> {
    let by_name: HashMap<&str, usize> = output
        .iter()
        .enumerate()
        .map(|(i, out)| (out.artifact.filename.as_str(), i))
        .collect();

    let updates = output
        .par_iter()
        .filter_map(|out| {
            let rewrite = out.rewrite.as_ref()?;
            let positions = rewrite.map.as_ref()?;
            let map_name = source_map_filename(&out.artifact.filename, &rewrite.original)?;
            let target = *by_name.get(map_name.as_str())?;
            let map_text = output[target].artifact.as_text()?;
            let generated = out.artifact.as_text()?;

            Some(
                remap_source_map(map_text, &rewrite.original, generated, positions)
                    .map(|remapped| (target, map_text.to_string(), remapped))
                    .map_err(|reason| OptimizeError::SourceMap {
                        filename: map_name,
                        reason,
                    }),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (target, original, remapped) in updates {
        let out = &mut output[target];
        if verbose {
            eprintln!(
                "Note: {}: {} mapping(s) moved",
                out.artifact.filename, remapped.moved
            );
        }
        out.artifact = Artifact::text(out.artifact.filename.clone(), remapped.json);
        out.rewrite = Some(ArtifactRewrite {
            role: ArtifactRole::SourceMap,
            edit_count: remapped.moved,
            original,
            map: None,
        });
    }
    Ok(())
}

fn plan_edits(
    artifacts: &[Artifact],
    classification: &Classification,
    reference: usize,
    options: &PassOptions,
) -> Result<Plan, OptimizeError> {
    let text_of = move |i: usize| artifacts[i].as_text().unwrap_or_default();

    let parsed = classification
        .language
        .iter()
        .map(|&i| {
            let filename = artifacts[i].filename.as_str();
            parse_language_artifact(filename, text_of(i))
                .map(|parsed| (i, parsed))
                .map_err(|reason| OptimizeError::Parse {
                    filename: filename.to_string(),
                    reason,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let index = parsed
        .iter()
        .find(|(i, _)| *i == reference)
        .map(|(_, parsed)| build_index(parsed))
        .unwrap_or_default();

    if options.verbose {
        for (_, parsed) in &parsed {
            eprintln!(
                "Note: {} ({}): {} entries",
                parsed.filename,
                parsed.dialect,
                parsed.entries.len()
            );
        }
        eprintln!(
            "Note: {} keys indexed from {}",
            index.keys.len(),
            artifacts[reference].filename
        );
    }

    let matcher = UsageMatcher::new(&options.translation_functions)?;

    let dictionaries: Vec<_> = parsed
        .par_iter()
        .map(|(i, parsed)| (*i, rewrite_dictionary(parsed, &index)))
        .collect();
    let usages: Vec<_> = classification
        .usage
        .par_iter()
        .map(|&i| (i, rewrite_usages(text_of(i), &matcher, &index.keys)))
        .collect();

    let mut stats = PassStats {
        language_artifacts: classification.language.len(),
        usage_artifacts: classification.usage.len(),
        ..PassStats::default()
    };
    let mut edits: Vec<Option<(ArtifactRole, EditSet)>> = vec![None; artifacts.len()];

    for (i, rewrite) in dictionaries {
        stats.inserted_entries += rewrite.inserted_entries;
        stats.filled_values += rewrite.filled_values;
        let role = if i == reference {
            ArtifactRole::Reference
        } else {
            ArtifactRole::Language
        };
        edits[i] = Some((role, rewrite.edits));
    }

    let mut used = BTreeSet::new();
    let mut missing = BTreeSet::new();
    for (i, rewrite) in usages {
        if options.verbose && rewrite.sites > 0 {
            eprintln!(
                "Note: {}: {} translation call(s), {} unknown key(s)",
                artifacts[i].filename,
                rewrite.sites,
                rewrite.missing.len()
            );
        }
        stats.rewritten_usages += rewrite.edits.len();
        used.extend(rewrite.used);
        missing.extend(rewrite.missing);
        edits[i] = Some((ArtifactRole::Usage, rewrite.edits));
    }

    let diagnostics = Diagnostics::collect(&index.keys, &used, missing);

    Ok(Plan {
        edits,
        index,
        diagnostics,
        stats,
    })
}
