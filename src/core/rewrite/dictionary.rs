//! Rewriting dictionary keys to ordinals and filling in missing entries.

use super::super::{
    edit::EditSet,
    escape::encode,
    index::ReferenceIndex,
    parse::ParsedLanguageArtifact,
};

#[derive(Debug, Default)]
pub struct DictionaryRewrite {
    pub edits: EditSet,
    /// Keys replaced by their ordinal.
    pub rewritten_keys: usize,
    /// Empty values replaced by the fallback text.
    pub filled_values: usize,
    /// Entries appended for reference keys this dictionary lacks.
    pub inserted_entries: usize,
    /// Keys not in the reference, left as they are.
    pub stale_keys: usize,
}

pub fn rewrite_dictionary(
    parsed: &ParsedLanguageArtifact<'_>,
    index: &ReferenceIndex,
) -> DictionaryRewrite {
    let mode = parsed.dialect.mode;
    let mut result = DictionaryRewrite::default();
    let mut seen = vec![false; index.keys.len()];

    for entry in &parsed.entries {
        let key = parsed.normalized_key(entry);
        let Some(ordinal) = index.keys.ordinal(&key) else {
            result.stale_keys += 1;
            continue;
        };

        result.edits.replace(entry.key, ordinal.to_string());
        result.rewritten_keys += 1;
        seen[ordinal] = true;

        if entry.value_is_empty {
            let fallback = index.fallbacks.fallback_for(&key);
            result.edits.replace(entry.value, encode(fallback, mode));
            result.filled_values += 1;
        }
    }

    let mut appended = String::new();
    let mut needs_separator = !parsed.entries.is_empty() && !parsed.trailing_comma;
    for (ordinal, key) in index.keys.iter().filter(|(ordinal, _)| !seen[*ordinal]) {
        if needs_separator {
            appended.push(',');
        }
        appended.push_str(&ordinal.to_string());
        appended.push(':');
        appended.push_str(&encode(index.fallbacks.fallback_for(key), mode));
        needs_separator = true;
        result.inserted_entries += 1;
    }
    if !appended.is_empty() {
        result.edits.insert(parsed.closing_brace, appended);
    }

    result
}
