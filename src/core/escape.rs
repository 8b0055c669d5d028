//! Canonicalizing and re-encoding quoted literal values.
//!
//! Keys and values are compared in their *normalized* form, i.e. the string
//! value a JavaScript engine would see, regardless of quote style, escaping or
//! how many string layers the artifact text is wrapped in.

use std::borrow::Cow;

use serde::Serialize;

use super::scan::scan_concatenation;

const NBSP: char = '\u{a0}';

/// How literal text is represented inside an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Ordinary generated JavaScript.
    Direct,
    /// The module code is itself the payload of a double-quoted string
    /// (`eval("...")`), so quotes and backslashes carry one extra escape and
    /// line breaks may appear as the two characters `\n`.
    Wrapped,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Direct => write!(f, "direct"),
            Mode::Wrapped => write!(f, "wrapped"),
        }
    }
}

/// Resolve the string value of literal text.
///
/// Handles `'a' + "b"` concatenation, any of the three quote styles and the
/// usual escape sequences. In wrapped mode one extra escaping layer is undone
/// first. Text that is not a literal (for example a bare object key) is
/// returned as is.
pub fn normalize(text: &str, mode: Mode) -> String {
    let unwrapped = match mode {
        Mode::Direct => Cow::Borrowed(text),
        Mode::Wrapped => Cow::Owned(unescape(text)),
    };
    let trimmed = unwrapped.trim();

    match scan_concatenation(trimmed, 0) {
        Some(segments) if segments.last().is_some_and(|s| s.end == trimmed.len()) => segments
            .iter()
            .map(|span| unescape(&trimmed[span.start + 1..span.end - 1]))
            .collect(),
        _ => text.to_string(),
    }
}

/// Encode a value as a single-quoted literal, the inverse of [`normalize`].
pub fn encode(value: &str, mode: Mode) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            NBSP => literal.push_str("\\xa0"),
            c => literal.push(c),
        }
    }
    literal.push('\'');

    match mode {
        Mode::Direct => literal,
        Mode::Wrapped => wrap_layer(&literal),
    }
}

/// Add one layer of double-quoted string escaping.
fn wrap_layer(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

/// Resolve JavaScript string escape sequences.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    decode_with(text, |c, _| out.push(c));
    out
}

/// Decode escape sequences, reporting every produced character together with
/// the byte offset of the sequence it came from.
pub(crate) fn decode_with(text: &str, mut emit: impl FnMut(char, usize)) {
    let mut pos = 0;
    while let Some(c) = text[pos..].chars().next() {
        let start = pos;
        pos += c.len_utf8();
        if c != '\\' {
            emit(c, start);
            continue;
        }

        let Some(next) = text[pos..].chars().next() else {
            emit('\\', start);
            break;
        };
        pos += next.len_utf8();

        match next {
            'n' => emit('\n', start),
            'r' => emit('\r', start),
            't' => emit('\t', start),
            'b' => emit('\u{8}', start),
            'f' => emit('\u{c}', start),
            'v' => emit('\u{b}', start),
            '0' => emit('\0', start),
            'x' => match hex_value(text.get(pos..pos + 2)).and_then(char::from_u32) {
                Some(decoded) => {
                    emit(decoded, start);
                    pos += 2;
                }
                None => emit('x', start),
            },
            'u' => match decode_unicode(text, pos) {
                Some((decoded, consumed)) => {
                    emit(decoded, start);
                    pos += consumed;
                }
                None => emit('u', start),
            },
            // Line continuation.
            '\r' => {
                if text[pos..].starts_with('\n') {
                    pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => emit(other, start),
        }
    }
}

/// Decode the part of a `\u` escape that follows the `u` at `pos`.
///
/// Returns the character and the number of bytes consumed after the `u`.
fn decode_unicode(text: &str, pos: usize) -> Option<(char, usize)> {
    if text[pos..].starts_with('{') {
        let close = text[pos..].find('}')?;
        let value = hex_value(text.get(pos + 1..pos + close))?;
        return char::from_u32(value).map(|c| (c, close + 1));
    }

    let high = hex_value(text.get(pos..pos + 4))?;
    if let Some(c) = char::from_u32(high) {
        return Some((c, 4));
    }

    // Surrogate pair spelled as two escapes.
    let rest = text.get(pos + 4..)?;
    if !(0xD800..0xDC00).contains(&high) || !rest.starts_with("\\u") {
        return None;
    }
    let low = hex_value(rest.get(2..6))?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(combined).map(|c| (c, 10))
}

fn hex_value(digits: Option<&str>) -> Option<u32> {
    let digits = digits?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
