//! The translation-key optimization engine.
//!
//! One pass reads a complete artifact set:
//!
//! 1. `classify`: language artifacts, usage artifacts, passthrough
//! 2. `parse`: locate the dictionary in each language artifact
//! 3. `index`: ordinals and fallbacks from the reference artifact
//! 4. `rewrite`: dictionary and usage edits
//! 5. `diagnostics`: missing and unused keys
//! 6. `source_map`: carry source maps of rewritten artifacts along
//!
//! [`optimize`] runs all of them. `file_scanner` loads artifacts from disk.

pub mod artifact;
pub mod classify;
pub mod diagnostics;
pub mod dialect;
pub mod edit;
pub mod escape;
pub mod file_scanner;
pub mod index;
pub mod parse;
pub mod pass;
pub mod rewrite;
pub mod scan;
pub mod source_map;

pub use artifact::{Artifact, ArtifactContent};
pub use diagnostics::Diagnostics;
pub use dialect::{DIALECTS, Dialect};
pub use edit::{EditSet, LineColumn, LineMapping, PositionMap};
pub use escape::{Mode, encode, normalize};
pub use index::TranslationKeyIndex;
pub use pass::{ArtifactRewrite, ArtifactRole, OutputArtifact, PassOptions, PassOutput, PassStats, optimize};
