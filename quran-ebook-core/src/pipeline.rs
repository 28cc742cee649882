//! Build Pipeline - Single Entry Point
//!
//! CRITICAL: `build` MUST check the configuration before the corpus source is
//! consulted and MUST validate the corpus before anything is rendered.
//! No bypass.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::archive::{assemble, ArchiveError, DocumentSet};
use crate::config::{BuildConfig, ConfigConflict, ConfigError, PairingWarning};
use crate::hashing::{compute_manifest_hash, document_digests, BuildManifest};
use crate::layout::{LayoutError, LayoutKind, RenderOptions};
use crate::markers::compute_markers;
use crate::model::Corpus;
use crate::navigation::{self, PackageMetadata};
use crate::registry::{self, SYMBOL_FONT_KEY};
use crate::source::{CorpusSource, DirectionLookup, FontResolver, SourceError, StaticDirections};
use crate::validation::{ValidationResult, ValidationViolation, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration conflicts: {}", join(.0))]
    Config(Vec<ConfigConflict>),

    #[error(transparent)]
    ConfigFile(ConfigError),

    #[error("Validation failed: {}", join(.0))]
    ValidationFailed(Vec<ValidationViolation>),

    #[error("Corpus source error: {0}")]
    Source(#[from] SourceError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ConfigError> for PipelineError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Conflicts(conflicts) => Self::Config(conflicts),
            other => Self::ConfigFile(other),
        }
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; ")
}

/// A finished package, not yet persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    /// Including the `.epub` extension.
    pub filename: String,
    pub package_id: Uuid,
    pub layout: LayoutKind,
    pub warnings: Vec<PairingWarning>,
    pub validation: ValidationResult,
    pub manifest: BuildManifest,
    pub manifest_hash: String,
    pub size: usize,
    #[serde(skip)]
    pub documents: DocumentSet,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl BuildOutput {
    /// Write the package into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, PipelineError> {
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| PipelineError::Io { path, source }
        };
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes).map_err(io_error(&path))?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "EPUB written");
        Ok(path)
    }
}

/// The build pipeline - single entry point for producing a package
pub struct BuildPipeline {
    corpus_source: Box<dyn CorpusSource>,
    fonts: Box<dyn FontResolver>,
    directions: Box<dyn DirectionLookup>,
    validator: Validator,
    modified: Option<DateTime<Utc>>,
}

impl BuildPipeline {
    pub fn new(
        corpus_source: impl CorpusSource + 'static,
        fonts: impl FontResolver + 'static,
    ) -> Self {
        Self {
            corpus_source: Box::new(corpus_source),
            fonts: Box::new(fonts),
            directions: Box::new(StaticDirections),
            validator: Validator::new(),
            modified: None,
        }
    }

    pub fn with_directions(mut self, directions: impl DirectionLookup + 'static) -> Self {
        self.directions = Box::new(directions);
        self
    }

    /// Pin `dcterms:modified` for reproducible packages.
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Validate a corpus.
    ///
    /// This is the ONLY validation entry point.
    pub fn validate_corpus(&self, corpus: &Corpus) -> ValidationResult {
        self.validator.validate(corpus)
    }

    fn render_options(&self, config: &BuildConfig) -> RenderOptions {
        RenderOptions {
            language: config.book.language.clone(),
            show_verse_numbers: config.layout.show_verse_numbers,
            show_invocation: config.layout.show_invocation,
            single_document: config.layout.single_document,
            translation_language: config.translation.as_ref().map(|t| t.language.clone()),
            translation_direction: config
                .translation
                .as_ref()
                .map(|t| self.directions.direction(&t.language))
                .unwrap_or(registry::TextDirection::Ltr),
        }
    }

    /// Build one package.
    ///
    /// CRITICAL: This ALWAYS validates the corpus internally. No bypass possible.
    #[instrument(skip(self, config), fields(output = %config.output_filename()))]
    pub fn build(&self, config: &BuildConfig) -> Result<BuildOutput, PipelineError> {
        // MANDATORY: conflicts are fatal before any collaborator runs
        let plan = config.check()?;
        for warning in &plan.warnings {
            tracing::warn!(script = %warning.script, font = %warning.font, "{}", warning);
        }
        tracing::info!(
            layout = plan.layout.key(),
            source = ?plan.source,
            font = plan.font.key,
            "Configuration checked"
        );

        if config.translation.is_some() && !self.corpus_source.supports_translation() {
            return Err(SourceError::TranslationUnsupported.into());
        }
        let corpus = self
            .corpus_source
            .load(&config.quran.script, config.translation.as_ref())?;

        // MANDATORY: validation is always called. This is non-negotiable.
        let validation = self.validate_corpus(&corpus);
        if !validation.violations.is_empty() {
            tracing::error!(violations = validation.violations.len(), "Corpus validation failed");
            return Err(PipelineError::ValidationFailed(validation.violations));
        }
        tracing::info!(chapters = validation.chapters, verses = validation.verses, "Corpus valid");

        let markers = compute_markers(&corpus);
        let layout = plan.layout.strategy(self.render_options(config));
        let content = layout.render(&corpus, &markers)?;
        tracing::info!(documents = content.len(), "Rendered content documents");

        let fonts = navigation::embedded_fonts(plan.font);
        let symbol = registry::font(SYMBOL_FONT_KEY).unwrap_or(plan.font);
        let modified = self.modified.unwrap_or_else(Utc::now);
        let metadata = PackageMetadata::from_config(config, modified, ENGINE_VERSION)
            .with_source(corpus.metadata.get("source").map(String::as_str));

        let mut documents = DocumentSet::new();
        documents.insert("META-INF/container.xml", navigation::container_xml());
        documents.insert(
            "META-INF/com.apple.ibooks.display-options.xml",
            navigation::ibooks_display_options(),
        );
        documents.insert(
            format!("OEBPS/{}", navigation::COVER_FILE),
            navigation::cover_document(config, ENGINE_VERSION),
        );
        documents.insert(
            format!("OEBPS/{}", navigation::NAV_FILE),
            navigation::nav_document(
                &corpus,
                &markers,
                layout.as_ref(),
                &config.book.language,
                config.translation.is_some(),
            ),
        );
        for document in &content {
            documents.insert(format!("OEBPS/{}", document.filename), document.content.clone());
        }
        documents.insert(
            format!("OEBPS/{}", navigation::STYLESHEET_FILE),
            navigation::stylesheet(plan.font, symbol),
        );
        for font in &fonts {
            documents.insert(format!("OEBPS/fonts/{}", font.filename), self.fonts.resolve(font)?);
        }
        documents.insert(
            format!("OEBPS/{}", navigation::PACKAGE_FILE),
            navigation::package_document(&metadata, &content, &fonts),
        );

        let bytes = assemble(&documents)?;

        let manifest = BuildManifest {
            engine_version: ENGINE_VERSION.to_string(),
            package_id: metadata.identifier.to_string(),
            filename: config.output_filename(),
            script: config.quran.script.clone(),
            font: plan.font.key.to_string(),
            layout: plan.layout.key().to_string(),
            modified: modified.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            documents: document_digests(&documents),
        };
        let manifest_hash = compute_manifest_hash(&manifest)?;
        tracing::info!(bytes = bytes.len(), manifest_hash = %manifest_hash, "Package assembled");

        Ok(BuildOutput {
            filename: format!("{}.epub", config.output_filename()),
            package_id: metadata.identifier,
            layout: plan.layout,
            warnings: plan.warnings,
            validation,
            manifest,
            manifest_hash,
            size: bytes.len(),
            documents,
            bytes,
        })
    }
}
