//! Collaborator seams - where the corpus and font bytes come from
//!
//! Retrieval and caching live outside this crate. The implementations here
//! read local files: a bulk JSON dump of the upstream API and a directory of
//! downloaded fonts.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::TranslationConfig;
use crate::ingest;
use crate::model::{is_qpc_script, Chapter, Corpus, Revelation, Verse, DEFAULT_INVOCATION};
use crate::registry::{self, FontInfo, TextDirection};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Invalid corpus dump {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("Font '{font}' not found at {}", .path.display())]
    MissingFont { font: String, path: PathBuf },

    #[error("Corpus source cannot supply translations")]
    TranslationUnsupported,

    #[error("Translation {resource_id} not present in the corpus dump")]
    MissingTranslation { resource_id: u32 },

    #[error("Verse {chapter}:{verse} has no '{script}' text")]
    MissingScript { script: String, chapter: u16, verse: u16 },

    #[error("Chapter {chapter} has unknown revelation place '{value}'")]
    UnknownRevelation { chapter: u16, value: String },
}

/// Supplies the corpus for one build.
pub trait CorpusSource {
    fn load(
        &self,
        script: &str,
        translation: Option<&TranslationConfig>,
    ) -> Result<Corpus, SourceError>;

    fn supports_translation(&self) -> bool {
        true
    }
}

/// Supplies font file bytes.
pub trait FontResolver {
    fn resolve(&self, font: &FontInfo) -> Result<Vec<u8>, SourceError>;
}

/// Writing direction of a language.
pub trait DirectionLookup {
    fn direction(&self, language: &str) -> TextDirection;
}

/// Built-in right-to-left language table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDirections;

impl DirectionLookup for StaticDirections {
    fn direction(&self, language: &str) -> TextDirection {
        registry::language_direction(language)
    }
}

/// Reads `<dir>/<font filename>`.
#[derive(Debug, Clone)]
pub struct DirFontResolver {
    dir: PathBuf,
}

impl DirFontResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FontResolver for DirFontResolver {
    fn resolve(&self, font: &FontInfo) -> Result<Vec<u8>, SourceError> {
        let path = self.dir.join(font.filename);
        fs::read(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => SourceError::MissingFont {
                font: font.key.to_string(),
                path: path.clone(),
            },
            _ => SourceError::Io { path: path.clone(), source },
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawDump {
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    chapters: Vec<RawChapter>,
}

#[derive(Debug, Deserialize)]
struct RawChapter {
    id: u16,
    name_arabic: String,
    name_simple: String,
    revelation_place: String,
    verses_count: u16,
    /// Language code to translated chapter name.
    #[serde(default)]
    translated_names: BTreeMap<String, String>,
    verses: Vec<RawVerse>,
}

#[derive(Debug, Deserialize)]
struct RawVerse {
    verse_number: u16,
    #[serde(default)]
    page_number: Option<u16>,
    #[serde(default)]
    juz_number: Option<u8>,
    #[serde(default)]
    rub_el_hizb_number: Option<u16>,
    #[serde(default)]
    sajdah_number: Option<u16>,
    /// Resource id to translation record.
    #[serde(default)]
    translations: BTreeMap<String, RawTranslation>,
    /// Script fields such as `qpc_uthmani_hafs` or `text_uthmani`.
    #[serde(flatten)]
    scripts: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawTranslation {
    text: String,
    #[serde(default)]
    foot_notes: BTreeMap<String, String>,
}

/// Bulk JSON dump shaped like the upstream API's chapter and verse records.
#[derive(Debug, Clone)]
pub struct JsonCorpusSource {
    path: PathBuf,
}

impl JsonCorpusSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_dump(&self) -> Result<RawDump, SourceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

fn revelation(chapter: u16, place: &str) -> Result<Revelation, SourceError> {
    match place {
        "makkah" | "meccan" => Ok(Revelation::Meccan),
        "madinah" | "medinan" => Ok(Revelation::Medinan),
        _ => Err(SourceError::UnknownRevelation {
            chapter,
            value: place.to_string(),
        }),
    }
}

fn convert_verse(
    chapter: u16,
    raw: RawVerse,
    script: &str,
    translation: Option<&TranslationConfig>,
) -> Result<Verse, SourceError> {
    let text = raw
        .scripts
        .get(script)
        .and_then(|v| v.as_str())
        .ok_or_else(|| SourceError::MissingScript {
            script: script.to_string(),
            chapter,
            verse: raw.verse_number,
        })?;

    // Only QPC text has its ۞ stripped; other scripts keep it inline.
    let qpc = is_qpc_script(script);
    let hizb_marker = qpc && ingest::has_hizb_mark(text);
    let text = if qpc {
        ingest::clean_qpc_text(text)
    } else {
        text.to_string()
    };

    let mut verse = Verse::new(chapter, raw.verse_number, text);
    verse.page = raw.page_number;
    verse.juz = raw.juz_number;
    verse.hizb_quarter = raw.rub_el_hizb_number;
    verse.sajdah = raw.sajdah_number.is_some();
    verse.hizb_marker = hizb_marker;

    if let Some(config) = translation {
        if let Some(record) = raw.translations.get(&config.resource_id.to_string()) {
            let (text, footnotes) = ingest::process_translation(&record.text, &record.foot_notes);
            verse.translation = Some(text);
            verse.footnotes = footnotes;
        }
    }
    Ok(verse)
}

impl CorpusSource for JsonCorpusSource {
    fn load(
        &self,
        script: &str,
        translation: Option<&TranslationConfig>,
    ) -> Result<Corpus, SourceError> {
        let dump = self.read_dump()?;
        let mut chapters = Vec::with_capacity(dump.chapters.len());

        for raw in dump.chapters {
            let name_translation = translation
                .and_then(|t| raw.translated_names.get(&t.language).cloned())
                .filter(|name| !name.is_empty());
            let verses = raw
                .verses
                .into_iter()
                .map(|v| convert_verse(raw.id, v, script, translation))
                .collect::<Result<Vec<_>, _>>()?;
            chapters.push(Chapter {
                number: raw.id,
                name_arabic: raw.name_arabic,
                name_transliteration: raw.name_simple,
                name_translation,
                revelation: revelation(raw.id, &raw.revelation_place)?,
                verse_count: raw.verses_count,
                verses,
            });
        }

        let corpus_has_translation =
            chapters.iter().flat_map(|c| &c.verses).any(|v| v.translation.is_some());
        if let Some(config) = translation {
            if !corpus_has_translation {
                return Err(SourceError::MissingTranslation {
                    resource_id: config.resource_id,
                });
            }
        }

        // Al-Fatihah 1:1 is the invocation in this script's own encoding
        let invocation = chapters
            .first()
            .filter(|c| c.number == 1)
            .and_then(|c| c.verses.first())
            .map(|v| v.text.clone())
            .unwrap_or_else(|| DEFAULT_INVOCATION.to_string());

        tracing::info!(
            path = %self.path.display(),
            script,
            chapters = chapters.len(),
            "Loaded corpus dump"
        );
        Ok(Corpus {
            chapters,
            script: script.to_string(),
            metadata: dump.metadata,
            invocation,
        })
    }
}
