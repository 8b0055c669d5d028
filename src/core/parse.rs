//! Locating the dictionary literal inside a language artifact.

use super::{
    dialect::{Dialect, split_regions},
    escape::normalize,
    scan::{Span, TextView, peek, scan_bare_key, scan_literal, skip_whitespace},
};
use crate::issues::ParseFailure;

/// One `KEY : VALUE` pair of a dictionary, as original-text spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub key: Span,
    pub value: Span,
    /// The value literal has nothing between its delimiters.
    pub value_is_empty: bool,
}

/// A language artifact with its dictionary located.
///
/// Every offset refers to the original artifact text.
#[derive(Debug, Clone)]
pub struct ParsedLanguageArtifact<'a> {
    pub filename: &'a str,
    pub text: &'a str,
    pub dialect: &'static Dialect,
    /// Offset of the dictionary's opening brace.
    pub dictionary_offset: usize,
    /// The dictionary literal, braces included.
    pub dictionary_text: &'a str,
    pub prefix: &'a str,
    pub suffix: &'a str,
    pub entries: Vec<DictionaryEntry>,
    /// Offset of the dictionary's closing brace.
    pub closing_brace: usize,
    /// A comma directly precedes the closing brace (ignoring whitespace).
    pub trailing_comma: bool,
}

impl<'a> ParsedLanguageArtifact<'a> {
    pub fn key_text(&self, entry: &DictionaryEntry) -> &'a str {
        entry.key.slice(self.text)
    }

    pub fn value_text(&self, entry: &DictionaryEntry) -> &'a str {
        entry.value.slice(self.text)
    }

    pub fn normalized_key(&self, entry: &DictionaryEntry) -> String {
        normalize(self.key_text(entry), self.dialect.mode)
    }

    pub fn normalized_value(&self, entry: &DictionaryEntry) -> String {
        normalize(self.value_text(entry), self.dialect.mode)
    }
}

/// Dictionary found in view coordinates.
struct ScannedDictionary {
    entries: Vec<(Span, Span)>,
    close: usize,
    trailing_comma: bool,
}

pub fn parse_language_artifact<'a>(
    filename: &'a str,
    text: &'a str,
) -> Result<ParsedLanguageArtifact<'a>, ParseFailure> {
    for region in split_regions(text) {
        let view = TextView::region(text, region.span, region.mode);
        for dialect in Dialect::candidates(region.mode) {
            if let Some(parsed) = parse_dialect(filename, &view, dialect)? {
                return Ok(parsed);
            }
        }
    }

    Err(ParseFailure::NoTemplate)
}

/// Parse the dictionary of `dialect` in `view`, `None` if its template does
/// not occur there.
fn parse_dialect<'a>(
    filename: &'a str,
    view: &TextView<'a>,
    dialect: &'static Dialect,
) -> Result<Option<ParsedLanguageArtifact<'a>>, ParseFailure> {
    let text = view.source();
    let template = dialect.template;
    let Some(prefix) = template.prefix().find(view.text()) else {
        return Ok(None);
    };
    let open = prefix.end() - 1;

    let scanned = scan_dictionary(view.text(), open).map_err(|(offset, expected)| {
        ParseFailure::Malformed {
            offset: view.to_source(offset),
            expected,
        }
    })?;

    let after = scanned.close + 1;
    if !template.suffix().is_match(&view.text()[after..]) {
        return Err(ParseFailure::UnexpectedSuffix {
            offset: view.to_source(after),
        });
    }

    let dictionary_offset = view.to_source(open);
    let dictionary_end = view.to_source(after);
    let entries = scanned
        .entries
        .iter()
        .map(|&(key, value)| DictionaryEntry {
            key: view.span_to_source(key),
            value: view.span_to_source(value),
            value_is_empty: value.len() == 2,
        })
        .collect();

    Ok(Some(ParsedLanguageArtifact {
        filename,
        text,
        dialect,
        dictionary_offset,
        dictionary_text: &text[dictionary_offset..dictionary_end],
        prefix: &text[..dictionary_offset],
        suffix: &text[dictionary_end..],
        entries,
        closing_brace: view.to_source(scanned.close),
        trailing_comma: scanned.trailing_comma,
    }))
}

/// Scan `{ KEY : VALUE, ... }` starting at the opening brace `open`.
fn scan_dictionary(text: &str, open: usize) -> Result<ScannedDictionary, (usize, &'static str)> {
    let mut entries = Vec::new();
    let mut pos = skip_whitespace(text, open + 1);

    if peek(text, pos) == Some('}') {
        return Ok(ScannedDictionary {
            entries,
            close: pos,
            trailing_comma: false,
        });
    }

    loop {
        let key = scan_literal(text, pos)
            .or_else(|| scan_bare_key(text, pos))
            .ok_or((pos, "a key"))?;

        pos = skip_whitespace(text, key.end);
        if peek(text, pos) != Some(':') {
            return Err((pos, "':'"));
        }
        pos = skip_whitespace(text, pos + 1);

        let value = scan_literal(text, pos).ok_or((pos, "a quoted value"))?;
        entries.push((key, value));

        pos = skip_whitespace(text, value.end);
        match peek(text, pos) {
            Some('}') => {
                return Ok(ScannedDictionary {
                    entries,
                    close: pos,
                    trailing_comma: false,
                });
            }
            Some(',') => {
                pos = skip_whitespace(text, pos + 1);
                if peek(text, pos) == Some('}') {
                    return Ok(ScannedDictionary {
                        entries,
                        close: pos,
                        trailing_comma: true,
                    });
                }
            }
            _ => return Err((pos, "',' or '}'")),
        }
    }
}
