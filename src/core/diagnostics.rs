//! Missing and unused translation keys, gathered over a whole pass.

use std::collections::BTreeSet;

use serde::Serialize;

use super::index::TranslationKeyIndex;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Keys used in code but absent from the reference language.
    pub missing_translations: BTreeSet<String>,
    /// Reference keys no usage artifact refers to.
    pub unused_translations: BTreeSet<String>,
}

impl Diagnostics {
    /// `used` holds ordinals seen in any usage artifact, `missing` the keys
    /// that had none.
    pub fn collect(
        index: &TranslationKeyIndex,
        used: &BTreeSet<usize>,
        missing: BTreeSet<String>,
    ) -> Self {
        let unused_translations = index
            .iter()
            .filter(|(ordinal, _)| !used.contains(ordinal))
            .map(|(_, key)| key.to_string())
            .collect();

        Self {
            missing_translations: missing,
            unused_translations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing_translations.is_empty() && self.unused_translations.is_empty()
    }

    /// Total number of reported keys.
    pub fn len(&self) -> usize {
        self.missing_translations.len() + self.unused_translations.len()
    }

    /// The single combined warning for this pass, or `None` when there is
    /// nothing to report.
    pub fn warning(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut lines = Vec::with_capacity(3);
        if !self.missing_translations.is_empty() {
            lines.push(format!(
                "missing translations ({}): {}",
                self.missing_translations.len(),
                join_keys(&self.missing_translations)
            ));
        }
        if !self.unused_translations.is_empty() {
            lines.push(format!(
                "unused translations ({}): {}",
                self.unused_translations.len(),
                join_keys(&self.unused_translations)
            ));
        }
        lines.push(
            "re-extract the reference translation file to bring it in sync with the code"
                .to_string(),
        );

        Some(lines.join("\n"))
    }
}

fn join_keys(keys: &BTreeSet<String>) -> String {
    keys.iter()
        .map(|key| format!("\"{}\"", key.escape_debug()))
        .collect::<Vec<_>>()
        .join(", ")
}
