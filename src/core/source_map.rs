//! Keeping standard (v3) source maps in step with rewritten artifacts.
//!
//! Shortening a key moves every later column on its line. The map that
//! belonged to the original artifact is replayed through the artifact's
//! [`PositionMap`] so each mapping points at the same code in the rewritten
//! text. Sources, names and source contents are carried over unchanged.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use sourcemap::{SourceMap, SourceMapBuilder};

use super::edit::{LineColumn, LineIndex, PositionMap};
use crate::issues::SourceMapError;

static SOURCE_MAPPING_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^//[#@][ \t]*sourceMappingURL=(\S+)[ \t]*\r?$").unwrap());

/// A source map regenerated for rewritten text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedSourceMap {
    pub json: String,
    /// Mappings whose generated position changed.
    pub moved: usize,
}

/// Filename of the source map belonging to an artifact.
///
/// Follows a relative `//# sourceMappingURL=` comment when there is one and
/// falls back to `<filename>.map` otherwise. Inline (`data:`) and remote maps
/// yield `None`.
pub fn source_map_filename(filename: &str, text: &str) -> Option<String> {
    let Some(url) = SOURCE_MAPPING_URL
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Some(format!("{}.map", filename));
    };
    if url.starts_with("data:") || url.contains("://") || url.starts_with('/') {
        return None;
    }

    let url = url.split(['?', '#']).next().unwrap_or(url);
    let mut parts: Vec<&str> = filename.split('/').collect();
    parts.pop();
    for segment in url.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            segment => parts.push(segment),
        }
    }
    Some(parts.join("/"))
}

/// Move every mapping of `map` from `original` onto `generated`.
pub fn remap_source_map(
    map: &str,
    original: &str,
    generated: &str,
    positions: &PositionMap,
) -> Result<RemappedSourceMap, SourceMapError> {
    let source_map = SourceMap::from_slice(map.as_bytes())?;
    let original_lines = LineIndex::new(original);
    let generated_lines = LineIndex::new(generated);

    let mut builder = SourceMapBuilder::new(source_map.get_file());
    // Same registration order keeps source and name indices stable.
    for id in 0..source_map.get_source_count() {
        if let Some(source) = source_map.get_source(id) {
            let new_id = builder.add_source(source);
            builder.set_source_contents(new_id, source_map.get_source_contents(id));
        }
    }
    for id in 0..source_map.get_name_count() {
        if let Some(name) = source_map.get_name(id) {
            builder.add_name(name);
        }
    }

    let mut moved = 0;
    let mut last = None;
    for token in source_map.tokens() {
        let before = LineColumn {
            line: token.get_dst_line() as usize + 1,
            column: token.get_dst_col() as usize,
        };
        let Some(offset) = original_lines.offset(original, before) else {
            continue;
        };
        let after = generated_lines.position(generated, positions.generated_offset(offset));

        // Mappings inside one replaced literal collapse onto its start.
        if last == Some(after) {
            continue;
        }
        last = Some(after);
        if after != before {
            moved += 1;
        }

        builder.add(
            (after.line - 1) as u32,
            after.column as u32,
            token.get_src_line(),
            token.get_src_col(),
            token.get_source(),
            token.get_name(),
            false,
        );
    }

    let mut written = Vec::new();
    builder.into_sourcemap().to_writer(&mut written)?;

    // Only the mappings change. Everything else (`sourceRoot`, ignore lists,
    // vendor fields) is kept as written, unless the builder had to merge
    // duplicate sources or names and renumbered them.
    let rebuilt: Value = serde_json::from_slice(&written)?;
    let mut json: Value = serde_json::from_str(map)?;
    let same_tables = ["sources", "names"]
        .into_iter()
        .all(|field| table_len(&json, field) == table_len(&rebuilt, field));
    if let (Some(target), Value::Object(rebuilt)) = (json.as_object_mut(), rebuilt) {
        if same_tables {
            if let Some(mappings) = rebuilt.get("mappings") {
                target.insert("mappings".to_string(), mappings.clone());
            }
        } else {
            target.extend(rebuilt);
        }
    }

    Ok(RemappedSourceMap {
        json: serde_json::to_string(&json)?,
        moved,
    })
}

fn table_len(json: &Value, field: &str) -> usize {
    json.get(field).and_then(Value::as_array).map_or(0, Vec::len)
}
