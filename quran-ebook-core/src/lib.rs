//! Quran EPUB Core - corpus validation, layout and packaging engine
//!
//! # Build Guarantees (Non-Negotiable)
//! 1. The Corpus Is Read-Only Once Loaded
//! 2. Conflicts Fail Before Loading
//! 3. Validation Precedes Rendering
//! 4. Every Href Resolves
//! 5. `mimetype` Comes First, Stored
//! 6. Same Input, Same Package

pub mod archive;
pub mod config;
pub mod hashing;
pub mod ingest;
pub mod layout;
pub mod markers;
pub mod model;
pub mod navigation;
pub mod pipeline;
pub mod registry;
pub mod source;
pub mod validation;

pub use archive::{assemble, ArchiveError, DocumentSet};
pub use config::{BuildConfig, ConfigConflict, ConfigError, PairingWarning};
pub use hashing::{canonical_json, compute_manifest_hash, sha256_hex, BuildManifest};
pub use layout::{ContentDocument, Layout, LayoutError, LayoutKind, RenderOptions};
pub use markers::{compute_markers, MarkerIndex};
pub use model::{Chapter, Corpus, Footnote, Revelation, Verse};
pub use pipeline::{BuildOutput, BuildPipeline, PipelineError};
pub use source::{
    CorpusSource, DirFontResolver, DirectionLookup, FontResolver, JsonCorpusSource, SourceError,
    StaticDirections,
};
pub use validation::{
    validate, ValidationResult, ValidationRule, ValidationViolation, Validator, ViolationSeverity,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
