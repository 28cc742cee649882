//! Corpus Model - the single source of truth for every build
//!
//! Loaded once, validated unmodified, then read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of chapters in a complete corpus.
pub const CHAPTER_COUNT: usize = 114;

/// Number of verses in a complete corpus (Hafs count).
pub const VERSE_COUNT: usize = 6236;

/// Default opening invocation in Uthmani script.
pub const DEFAULT_INVOCATION: &str = "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    /// Stable across the whole corpus.
    pub id: u64,
    /// Display number within the owning verse's translation.
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub chapter: u16,
    pub number: u16,
    pub text: String,
    #[serde(default)]
    pub page: Option<u16>,
    #[serde(default)]
    pub juz: Option<u8>,
    #[serde(default)]
    pub hizb_quarter: Option<u16>,
    #[serde(default)]
    pub sajdah: bool,
    /// Source text carried a rub-al-hizb mark before ingestion stripped it.
    #[serde(default)]
    pub hizb_marker: bool,
    /// Translation with footnote markers already rewritten as noteref links.
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
}

impl Verse {
    /// A bare verse with no pagination or translation data.
    pub fn new(chapter: u16, number: u16, text: impl Into<String>) -> Self {
        Self {
            chapter,
            number,
            text: text.into(),
            page: None,
            juz: None,
            hizb_quarter: None,
            sajdah: false,
            hizb_marker: false,
            translation: None,
            footnotes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revelation {
    Meccan,
    Medinan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u16,
    pub name_arabic: String,
    pub name_transliteration: String,
    #[serde(default)]
    pub name_translation: Option<String>,
    pub revelation: Revelation,
    pub verse_count: u16,
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// Every chapter opens with the invocation except At-Tawbah (9).
    pub fn has_opening_invocation(&self) -> bool {
        self.number != 9
    }

    /// In Al-Fatihah (1) the invocation is verse 1 itself.
    pub fn invocation_is_first_verse(&self) -> bool {
        self.number == 1
    }

    /// Whether the layout should render a standalone invocation line.
    pub fn renders_invocation(&self) -> bool {
        self.has_opening_invocation() && !self.invocation_is_first_verse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub chapters: Vec<Chapter>,
    /// Script/encoding identifier, e.g. `qpc_uthmani_hafs`.
    pub script: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default = "default_invocation")]
    pub invocation: String,
}

fn default_invocation() -> String {
    DEFAULT_INVOCATION.to_string()
}

impl Corpus {
    pub fn total_verses(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }

    pub fn chapter(&self, number: u16) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }

    /// All verses in reading order.
    pub fn verses(&self) -> impl Iterator<Item = &Verse> {
        self.chapters.iter().flat_map(|c| c.verses.iter())
    }

    pub fn has_translation(&self) -> bool {
        self.verses().any(|v| v.translation.is_some())
    }

    /// Script belongs to the QPC encoding family.
    pub fn is_qpc(&self) -> bool {
        is_qpc_script(&self.script)
    }
}

pub fn is_qpc_script(script: &str) -> bool {
    script.starts_with("qpc_") || script.starts_with("text_qpc_")
}
