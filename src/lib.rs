//! keyshrink - translation key optimizer for built Vue i18n bundles
//!
//! keyshrink rewrites translation dictionaries and translation calls in
//! webpack output so that every key is replaced by a compact ordinal taken
//! from the reference language. It reports keys used in code but missing from
//! the reference, and reference keys nothing uses.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: The optimization engine
//! - `issues`: Errors that abort a pass

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
