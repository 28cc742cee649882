//! Build Configuration - JSON files with per-section defaults
//!
//! `check` turns a raw configuration into a `BuildPlan` or the complete list
//! of conflicts. Nothing is loaded or rendered before it passes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::layout::LayoutKind;
use crate::registry::{self, FontInfo};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub title: String,
    pub language: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            title: "القرآن الكريم".to_string(),
            language: "ar".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuranConfig {
    pub script: String,
    pub source: String,
}

impl Default for QuranConfig {
    fn default() -> Self {
        Self {
            script: "qpc_uthmani_hafs".to_string(),
            source: "quran_api".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub arabic: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { arabic: "kfgqpc_uthmanic_hafs".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub structure: String,
    /// Inline layout only: all chapters in one document.
    pub single_document: bool,
    pub show_verse_numbers: bool,
    pub show_invocation: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            structure: LayoutKind::ByChapter.key().to_string(),
            single_document: false,
            show_verse_numbers: true,
            show_invocation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub resource_id: u32,
    pub language: String,
    pub name: String,
    /// Used in auto-generated filenames.
    pub abbreviation: String,
    pub language_name: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            resource_id: 20,
            language: "en".to_string(),
            name: "Sahih International".to_string(),
            abbreviation: "sahih".to_string(),
            language_name: None,
        }
    }
}

impl TranslationConfig {
    /// "English — Sahih International"
    pub fn byline(&self) -> String {
        let language = self
            .language_name
            .clone()
            .or_else(|| registry::native_language_name(&self.language).map(str::to_string))
            .unwrap_or_else(|| self.language.to_uppercase());
        format!("{} — {}", language, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Empty = derive from the rest of the configuration.
    pub filename: String,
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: String::new(),
            directory: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub book: BookConfig,
    pub quran: QuranConfig,
    pub font: FontConfig,
    /// `None` = Arabic only.
    pub translation: Option<TranslationConfig>,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    QuranApi,
    Tanzil,
}

impl DataSource {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "quran_api" => Some(Self::QuranApi),
            "tanzil" => Some(Self::Tanzil),
            _ => None,
        }
    }

    pub fn supports_translation(self) -> bool {
        matches!(self, Self::QuranApi)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigConflict {
    #[error("{layout} layout requires a translation config")]
    MissingTranslation { layout: String },

    #[error("translation support requires the quran_api source, not {data_source}")]
    TranslationUnsupported { data_source: String },

    #[error("unknown data source '{data_source}' (known: quran_api, tanzil)")]
    UnknownSource { data_source: String },

    #[error("unknown script '{script}' (known: {known})")]
    UnknownScript { script: String, known: String },

    #[error("unknown font '{font}' (known: {known})")]
    UnknownFont { font: String, known: String },

    #[error("unknown layout '{layout}' (known: {known})")]
    UnknownLayout { layout: String, known: String },
}

/// Non-fatal: the pairing may render artifacts, but users may experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingWarning {
    pub script: String,
    pub font: String,
    pub recommended: Vec<String>,
}

impl std::fmt::Display for PairingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Font '{}' is not a validated match for script '{}'. Recommended fonts: {}. \
             This may cause rendering artifacts (sukun dots, broken ligatures).",
            self.font,
            self.script,
            self.recommended.join(", ")
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("Configuration conflicts: {}", join_conflicts(.0))]
    Conflicts(Vec<ConfigConflict>),
}

fn join_conflicts(conflicts: &[ConfigConflict]) -> String {
    conflicts.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("; ")
}

/// A configuration that passed every check.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub layout: LayoutKind,
    pub source: DataSource,
    pub font: &'static FontInfo,
    pub warnings: Vec<PairingWarning>,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the layout, source and font, collecting every conflict.
    pub fn check(&self) -> Result<BuildPlan, ConfigError> {
        let mut conflicts = vec![];

        let source = DataSource::from_key(&self.quran.source);
        match source {
            None => conflicts.push(ConfigConflict::UnknownSource {
                data_source: self.quran.source.clone(),
            }),
            Some(s) if self.translation.is_some() && !s.supports_translation() => {
                conflicts.push(ConfigConflict::TranslationUnsupported {
                    data_source: self.quran.source.clone(),
                })
            }
            Some(_) => {}
        }

        if !registry::is_known_script(&self.quran.script) {
            conflicts.push(ConfigConflict::UnknownScript {
                script: self.quran.script.clone(),
                known: registry::SCRIPT_FONT_PAIRS
                    .iter()
                    .map(|(s, _)| *s)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let font = registry::font(&self.font.arabic);
        if font.is_none() {
            conflicts.push(ConfigConflict::UnknownFont {
                font: self.font.arabic.clone(),
                known: registry::FONTS.iter().map(|f| f.key).collect::<Vec<_>>().join(", "),
            });
        }

        let layout = match LayoutKind::from_key(&self.layout.structure) {
            None => {
                conflicts.push(ConfigConflict::UnknownLayout {
                    layout: self.layout.structure.clone(),
                    known: LayoutKind::ALL.iter().map(|l| l.key()).collect::<Vec<_>>().join(", "),
                });
                None
            }
            Some(kind) if kind.requires_translation() && self.translation.is_none() => {
                conflicts.push(ConfigConflict::MissingTranslation {
                    layout: kind.key().to_string(),
                });
                None
            }
            // Any translated build without the interactive layout is bilingual
            Some(LayoutKind::ByChapter | LayoutKind::Inline) if self.translation.is_some() => {
                Some(LayoutKind::Bilingual)
            }
            Some(kind) => Some(kind),
        };

        match (layout, source, font) {
            (Some(layout), Some(source), Some(font)) if conflicts.is_empty() => Ok(BuildPlan {
                layout,
                source,
                font,
                warnings: self.pairing_warnings(),
            }),
            _ => Err(ConfigError::Conflicts(conflicts)),
        }
    }

    /// Warn when the font is not a validated match for the script.
    pub fn pairing_warnings(&self) -> Vec<PairingWarning> {
        match registry::fonts_for_script(&self.quran.script) {
            Some(valid) if !valid.is_empty() && !valid.contains(&self.font.arabic.as_str()) => {
                vec![PairingWarning {
                    script: self.quran.script.clone(),
                    font: self.font.arabic.clone(),
                    recommended: valid.iter().map(|f| f.to_string()).collect(),
                }]
            }
            _ => vec![],
        }
    }

    /// Layout key after translation promotion, used for names and labels.
    pub fn effective_layout_key(&self) -> &str {
        match LayoutKind::from_key(&self.layout.structure) {
            Some(LayoutKind::ByChapter | LayoutKind::Inline) if self.translation.is_some() => {
                LayoutKind::Bilingual.key()
            }
            _ => &self.layout.structure,
        }
    }

    /// Pattern: quran_{riwayah}_{script}_{font}_{layout}_{lang}[-{tr lang}-{tr abbrev}]
    pub fn auto_filename(&self) -> String {
        let lang = match &self.translation {
            Some(t) => format!("{}-{}-{}", self.book.language, t.language, t.abbreviation),
            None => self.book.language.clone(),
        };
        let mut parts = vec![
            "quran".to_string(),
            registry::riwayah(&self.quran.script).to_string(),
            registry::abbreviate_script(&self.quran.script).to_string(),
            registry::abbreviate_font(&self.font.arabic).to_string(),
            registry::abbreviate_layout(self.effective_layout_key()).to_string(),
        ];
        if self.layout.single_document && self.effective_layout_key() == LayoutKind::Inline.key() {
            parts.push("single".to_string());
        }
        parts.push(lang);
        parts.join("_")
    }

    /// Explicit override, or the auto-generated name.
    pub fn output_filename(&self) -> String {
        if self.output.filename.is_empty() {
            self.auto_filename()
        } else {
            self.output.filename.clone()
        }
    }
}

/// Every `*.json` config in a directory, sorted by name.
pub fn config_paths_in(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut paths = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(false, |e| e == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
