//! Rewriting translation keys at call sites.
//!
//! Three call shapes are recognized:
//!
//! - direct calls of a translation function: `$t("key")`, `this.$tc('key', 2)`
//! - legacy component interpolation: `_c("i18n", {attrs: {path: "key"}})`
//! - component objects: `_createVNode(_component_i18n_t, {keypath: "key"})`,
//!   including minified callees and components (`(0,r.Wm)(o,{keypath:"key"})`)
//!
//! Only the first literal of a `+`-concatenated key expression is looked up
//! and replaced. Sites whose key is not a literal are left alone.
//!
//! Direct code and the bodies of `eval("...")` module strings are scanned
//! separately, each in its own escaping mode.

use std::collections::BTreeSet;

use regex::Regex;

use super::super::{
    dialect::split_regions,
    edit::EditSet,
    escape::{Mode, encode, normalize},
    index::TranslationKeyIndex,
    scan::{TextView, scan_concatenation},
};

const QUOTE: &str = r#"["'`]"#;

/// Compiled matcher for every call shape. Each alternative ends right before
/// the key literal.
#[derive(Debug, Clone)]
pub struct UsageMatcher {
    pattern: Regex,
}

impl UsageMatcher {
    pub fn new(translation_functions: &[String]) -> Result<Self, regex::Error> {
        let mut alternatives = Vec::with_capacity(3);

        if !translation_functions.is_empty() {
            let names: Vec<String> = translation_functions
                .iter()
                .map(|name| regex::escape(name))
                .collect();
            alternatives.push(format!(r"(?:\A|[^\w$])(?:{})\s*\(\s*", names.join("|")));
        }

        alternatives.push(format!(
            r"\(\s*{q}i18n{q}\s*,\s*\{{(?:[^{{}}]*?[,\s])?{q}?attrs{q}?\s*:\s*\{{(?:[^{{}}]*?[,\s])?{q}?path{q}?\s*:\s*",
            q = QUOTE
        ));

        alternatives.push(format!(
            r"[\w$)\]]\s*\(\s*[\w$.]+\s*,\s*\{{(?:[^{{}}]*?[,\s])?{q}?keypath{q}?\s*:\s*",
            q = QUOTE
        ));

        Ok(Self {
            pattern: Regex::new(&alternatives.join("|"))?,
        })
    }
}

#[derive(Debug, Default)]
pub struct UsageRewrite {
    pub edits: EditSet,
    /// Ordinals referenced by this artifact.
    pub used: BTreeSet<usize>,
    /// Literal keys with no ordinal.
    pub missing: BTreeSet<String>,
    /// Call sites with a literal key, found or not.
    pub sites: usize,
}

pub fn rewrite_usages(
    text: &str,
    matcher: &UsageMatcher,
    index: &TranslationKeyIndex,
) -> UsageRewrite {
    let mut result = UsageRewrite::default();
    for region in split_regions(text) {
        let view = TextView::region(text, region.span, region.mode);
        rewrite_region(&view, region.mode, matcher, index, &mut result);
    }
    result
}

fn rewrite_region(
    view: &TextView<'_>,
    mode: Mode,
    matcher: &UsageMatcher,
    index: &TranslationKeyIndex,
    result: &mut UsageRewrite,
) {
    let text = view.source();
    let haystack = view.text();
    let mut pos = 0;

    while let Some(site) = matcher.pattern.find_at(haystack, pos) {
        pos = site.end();
        let Some(segments) = scan_concatenation(haystack, site.end()) else {
            continue;
        };
        let first = segments[0];
        pos = segments[segments.len() - 1].end;
        result.sites += 1;

        let literal = view.span_to_source(first);
        let key = normalize(literal.slice(text), mode);
        match index.ordinal(&key) {
            Some(ordinal) => {
                // Always quoted: a bare `0` would read as "no key".
                result
                    .edits
                    .replace(literal, encode(&ordinal.to_string(), mode));
                result.used.insert(ordinal);
            }
            None => {
                result.missing.insert(key);
            }
        }
    }
}
