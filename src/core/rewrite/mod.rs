//! Edit computation for language artifacts and usage artifacts.
//!
//! Both rewriters only produce an [`EditSet`](super::edit::EditSet) against
//! the original text; applying it is left to the pass.

pub mod dictionary;
pub mod usage;

pub use dictionary::{DictionaryRewrite, rewrite_dictionary};
pub use usage::{UsageMatcher, UsageRewrite, rewrite_usages};
