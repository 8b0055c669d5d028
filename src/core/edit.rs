//! Batched, offset-preserving text replacement.
//!
//! Edits are always expressed against the original text and applied in one
//! go, which also yields a [`PositionMap`] from the rewritten text back to the
//! original.

use serde::Serialize;

use super::scan::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditSet {
    edits: Vec<Edit>,
}

/// Two edits cover the same original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOverlap {
    pub offset: usize,
}

/// Result of applying an [`EditSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub map: PositionMap,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, span: Span, replacement: impl Into<String>) {
        self.edits.push(Edit {
            span,
            replacement: replacement.into(),
        });
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(Span::empty(at), text);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Apply every edit to `original`.
    ///
    /// Edits are ordered by position; insertions at the same offset keep the
    /// order they were added in and come before a replacement starting there.
    pub fn apply(mut self, original: &str) -> Result<Rewrite, EditOverlap> {
        self.edits.sort_by_key(|e| (e.span.start, e.span.end));

        let mut text = String::with_capacity(original.len());
        let mut segments = Vec::with_capacity(self.edits.len() * 2 + 1);
        let mut cursor = 0;

        for edit in &self.edits {
            if edit.span.start < cursor || edit.span.end > original.len() {
                return Err(EditOverlap {
                    offset: edit.span.start,
                });
            }
            if edit.span.start > cursor {
                push_segment(
                    &mut segments,
                    &mut text,
                    &original[cursor..edit.span.start],
                    Span::new(cursor, edit.span.start),
                    false,
                );
            }
            push_segment(
                &mut segments,
                &mut text,
                &edit.replacement,
                edit.span,
                true,
            );
            cursor = edit.span.end;
        }

        if cursor < original.len() {
            push_segment(
                &mut segments,
                &mut text,
                &original[cursor..],
                Span::new(cursor, original.len()),
                false,
            );
        }

        Ok(Rewrite {
            text,
            map: PositionMap {
                segments,
                original_len: original.len(),
            },
        })
    }
}

fn push_segment(
    segments: &mut Vec<MappedSegment>,
    text: &mut String,
    content: &str,
    original: Span,
    replaced: bool,
) {
    let start = text.len();
    text.push_str(content);
    segments.push(MappedSegment {
        generated: Span::new(start, text.len()),
        original,
        replaced,
    });
}

/// One stretch of rewritten text and the original text it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappedSegment {
    pub generated: Span,
    pub original: Span,
    /// `false` when the text was copied unchanged.
    pub replaced: bool,
}

/// Maps offsets in rewritten text back to the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionMap {
    segments: Vec<MappedSegment>,
    original_len: usize,
}

impl PositionMap {
    /// Map for text that was not changed.
    pub fn identity(len: usize) -> Self {
        let segments = if len == 0 {
            Vec::new()
        } else {
            vec![MappedSegment {
                generated: Span::new(0, len),
                original: Span::new(0, len),
                replaced: false,
            }]
        };
        Self {
            segments,
            original_len: len,
        }
    }

    pub fn segments(&self) -> &[MappedSegment] {
        &self.segments
    }

    /// Original offset of a generated offset.
    ///
    /// Offsets inside unchanged text map one to one; offsets inside a
    /// replacement map to the start of the replaced original text.
    pub fn original_offset(&self, generated: usize) -> usize {
        let idx = self.segments.partition_point(|s| s.generated.end <= generated);
        match self.segments.get(idx) {
            Some(segment) => {
                if segment.replaced {
                    segment.original.start
                } else {
                    segment.original.start + (generated - segment.generated.start)
                }
            }
            None => self.original_len,
        }
    }

    /// Generated offset of an original offset.
    ///
    /// Offsets inside unchanged text map one to one; offsets inside replaced
    /// text map to the start of its replacement. Text inserted at an offset
    /// comes before it.
    pub fn generated_offset(&self, original: usize) -> usize {
        let idx = self.segments.partition_point(|s| s.original.end <= original);
        match self.segments.get(idx) {
            Some(segment) => {
                if segment.replaced {
                    segment.generated.start
                } else {
                    segment.generated.start + (original - segment.original.start)
                }
            }
            None => self.segments.last().map_or(0, |s| s.generated.end),
        }
    }

    /// Line/column mappings at every segment start, for source-map tooling.
    pub fn line_mappings(&self, generated_text: &str, original_text: &str) -> Vec<LineMapping> {
        let generated_lines = LineIndex::new(generated_text);
        let original_lines = LineIndex::new(original_text);
        self.segments
            .iter()
            .filter(|s| !s.generated.is_empty())
            .map(|s| LineMapping {
                generated: generated_lines.position(generated_text, s.generated.start),
                original: original_lines.position(original_text, s.original.start),
            })
            .collect()
    }
}

/// 1-based line, 0-based column in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineMapping {
    pub generated: LineColumn,
    pub original: LineColumn,
}

/// Byte offsets where each line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    pub fn position(&self, text: &str, offset: usize) -> LineColumn {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let start = self.starts[line];
        LineColumn {
            line: line + 1,
            column: text[start..offset].encode_utf16().count(),
        }
    }

    /// Byte offset of a position, the inverse of [`LineIndex::position`].
    ///
    /// A column past the end of its line clamps to the line end; `None` when
    /// the line does not exist.
    pub fn offset(&self, text: &str, position: LineColumn) -> Option<usize> {
        let start = *self.starts.get(position.line.checked_sub(1)?)?;
        let end = self
            .starts
            .get(position.line)
            .map_or(text.len(), |next| next - 1);

        let mut units = 0;
        for (i, c) in text[start..end].char_indices() {
            if units >= position.column {
                return Some(start + i);
            }
            units += c.len_utf16();
        }
        Some(end)
    }
}
