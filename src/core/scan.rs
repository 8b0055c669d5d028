//! Offset-preserving text views and literal tokenizing.
//!
//! Generated bundles come in two escaping conventions (see [`Mode`]), often
//! within one file. Rather than maintaining two sets of matchers, every
//! scanner in the crate runs over a [`TextView`] of one region: for direct
//! code the view is the text itself, for an evaluated module string it is the
//! string body with one literal layer decoded. Each decoded position
//! remembers the original offset it came from, so spans found in the view can
//! always be mapped back onto the untouched artifact text.

use std::borrow::Cow;

use serde::Serialize;

use super::escape::{Mode, decode_with};

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Quote characters that can delimit a literal.
pub const QUOTES: [char; 3] = ['"', '\'', '`'];

/// A readable view over a region of artifact text.
#[derive(Debug)]
pub struct TextView<'a> {
    source: &'a str,
    text: Cow<'a, str>,
    /// Source offset of the region start.
    base: usize,
    /// Source offset for every decoded byte, plus one trailing entry for the
    /// end of the region. `None` when the view is the source text itself.
    origins: Option<Vec<usize>>,
}

impl<'a> TextView<'a> {
    /// View of the whole source. Wrapped mode decodes one layer of
    /// string-literal escaping.
    pub fn new(source: &'a str, mode: Mode) -> Self {
        Self::region(source, Span::new(0, source.len()), mode)
    }

    /// View of `span` only. Offsets reported by [`TextView::to_source`] still
    /// refer to the whole source.
    pub fn region(source: &'a str, span: Span, mode: Mode) -> Self {
        let slice = span.slice(source);
        match mode {
            Mode::Direct => Self {
                source,
                text: Cow::Borrowed(slice),
                base: span.start,
                origins: None,
            },
            Mode::Wrapped => {
                let mut text = String::with_capacity(slice.len());
                let mut origins = Vec::with_capacity(slice.len() + 1);
                decode_with(slice, |c, origin| {
                    text.push(c);
                    origins.extend(std::iter::repeat_n(span.start + origin, c.len_utf8()));
                });
                origins.push(span.end);
                Self {
                    source,
                    text: Cow::Owned(text),
                    base: span.start,
                    origins: Some(origins),
                }
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Map a view offset onto the source text.
    pub fn to_source(&self, offset: usize) -> usize {
        match &self.origins {
            None => self.base + offset,
            Some(origins) => origins[offset],
        }
    }

    pub fn span_to_source(&self, span: Span) -> Span {
        Span::new(self.to_source(span.start), self.to_source(span.end))
    }
}

/// Skip whitespace starting at `pos`.
pub fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace() && *c != '\u{feff}')
        .map_or(text.len(), |(i, _)| pos + i)
}

pub fn peek(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().next()
}

/// Scan one quoted literal starting exactly at `start`.
///
/// Returns the span including both delimiters. Single and double quoted
/// literals may not contain a raw line break; template literals may.
pub fn scan_literal(text: &str, start: usize) -> Option<Span> {
    let quote = peek(text, start).filter(|c| QUOTES.contains(c))?;
    let mut chars = text[start + 1..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '\n' | '\r' if quote != '`' => return None,
            c if c == quote => return Some(Span::new(start, start + 1 + i + 1)),
            _ => {}
        }
    }
    None
}

/// Scan a bare object key: identifier characters (Unicode letters and digits,
/// `_`, `$`, ZWNJ, ZWJ), which also covers numeric keys.
pub fn scan_bare_key(text: &str, start: usize) -> Option<Span> {
    let len: usize = text[start..]
        .chars()
        .take_while(|&c| is_identifier_char(c))
        .map(char::len_utf8)
        .sum();
    (len > 0).then(|| Span::new(start, start + len))
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '\u{200c}' | '\u{200d}')
}

/// Scan a literal followed by any number of `+`-concatenated literals.
///
/// Stops before a `+` that is not followed by another literal, so
/// `'a' + 'b' + name` yields the spans of `'a'` and `'b'`.
pub fn scan_concatenation(text: &str, start: usize) -> Option<Vec<Span>> {
    let first = scan_literal(text, start)?;
    let mut end = first.end;
    let mut segments = vec![first];
    loop {
        let pos = skip_whitespace(text, end);
        if peek(text, pos) != Some('+') {
            break;
        }
        let next = skip_whitespace(text, pos + 1);
        match scan_literal(text, next) {
            Some(span) => {
                end = span.end;
                segments.push(span);
            }
            None => break,
        }
    }
    Some(segments)
}
