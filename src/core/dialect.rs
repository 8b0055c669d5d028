//! Code-generation dialects of language artifacts.
//!
//! A dialect is a template (the module-wrapping convention around the
//! dictionary literal) combined with an escaping [`Mode`]. Supporting another
//! bundler output means adding a template and a table entry, not another code
//! path in the parser.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{
    escape::Mode,
    scan::{Span, scan_literal},
};

/// `e.exports={...}` as emitted by production builds.
static MINIFIED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_$][\w$]*\.exports=\{").unwrap());
static MINIFIED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(?:[;,)}\]]|\s*\z)").unwrap());

/// `module.exports = {...};` as emitted by development builds. The statement
/// may also end at a module separator comment such as `/***/ })`.
static DEVELOPMENT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"module\.exports\s*=\s*\{").unwrap());
static DEVELOPMENT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*(?:[;,)}]|/[/*]|\z)").unwrap());

/// Opening of an evaluated module string, `eval("` or
/// `eval(__webpack_require__.ts("`. The match ends on the quote.
static EVAL_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\beval\(\s*(?:[\w$.]+\(\s*)?""#).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    Minified,
    Development,
}

impl Template {
    /// Templates in the order they are tried.
    pub const ALL: [Template; 2] = [Template::Minified, Template::Development];

    /// Regex matching everything up to and including the dictionary's
    /// opening brace.
    pub fn prefix(self) -> &'static Regex {
        match self {
            Template::Minified => &MINIFIED_PREFIX,
            Template::Development => &DEVELOPMENT_PREFIX,
        }
    }

    /// Regex that must match the text right after the closing brace.
    pub fn suffix(self) -> &'static Regex {
        match self {
            Template::Minified => &MINIFIED_SUFFIX,
            Template::Development => &DEVELOPMENT_SUFFIX,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Dialect {
    pub name: &'static str,
    pub template: Template,
    pub mode: Mode,
}

pub static DIALECTS: [Dialect; 4] = [
    Dialect {
        name: "minified",
        template: Template::Minified,
        mode: Mode::Direct,
    },
    Dialect {
        name: "development",
        template: Template::Development,
        mode: Mode::Direct,
    },
    Dialect {
        name: "minified-eval",
        template: Template::Minified,
        mode: Mode::Wrapped,
    },
    Dialect {
        name: "development-eval",
        template: Template::Development,
        mode: Mode::Wrapped,
    },
];

impl Dialect {
    pub fn lookup(template: Template, mode: Mode) -> &'static Dialect {
        DIALECTS
            .iter()
            .find(|d| d.template == template && d.mode == mode)
            .unwrap_or(&DIALECTS[0])
    }

    /// Dialects sharing the escaping mode, in template order.
    pub fn candidates(mode: Mode) -> impl Iterator<Item = &'static Dialect> {
        Template::ALL
            .into_iter()
            .map(move |template| Dialect::lookup(template, mode))
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A stretch of artifact text read in one escaping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub span: Span,
    pub mode: Mode,
}

/// Split artifact text into direct code and the bodies of evaluated module
/// strings.
///
/// Only the contents between the quotes of an `eval("...")` argument are
/// wrapped; everything around them, including the `eval(` call itself, is
/// direct code. Regions are returned in text order and cover the whole text.
pub fn split_regions(text: &str) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut cursor = 0;
    let mut pos = 0;

    while let Some(m) = EVAL_STRING.find_at(text, pos) {
        let quote = m.end() - 1;
        let Some(literal) = scan_literal(text, quote) else {
            pos = m.end();
            continue;
        };
        regions.push(Region {
            span: Span::new(cursor, quote + 1),
            mode: Mode::Direct,
        });
        regions.push(Region {
            span: Span::new(quote + 1, literal.end - 1),
            mode: Mode::Wrapped,
        });
        cursor = literal.end - 1;
        pos = literal.end;
    }

    regions.push(Region {
        span: Span::new(cursor, text.len()),
        mode: Mode::Direct,
    });
    regions
}
