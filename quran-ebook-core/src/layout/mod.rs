//! Layout Strategies - one render contract, four implementations
//!
//! Each strategy turns the corpus into ordered content documents and exposes
//! the anchor scheme the navigation builder links against. Every href a
//! strategy emits resolves to an id inside the document it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markers::MarkerIndex;
use crate::model::Corpus;
use crate::registry::TextDirection;

pub mod annotations;
pub mod bilingual;
pub mod by_chapter;
pub mod inline;
pub mod interactive;
pub mod xhtml;

pub use annotations::{ANNOTATIONS_FILE, ANNOTATIONS_ID};
pub use bilingual::Bilingual;
pub use by_chapter::ByChapter;
pub use inline::Inline;
pub use interactive::Interactive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    ByChapter,
    Inline,
    Bilingual,
    Interactive,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::ByChapter,
        LayoutKind::Inline,
        LayoutKind::Bilingual,
        LayoutKind::Interactive,
    ];

    /// Configuration key.
    pub fn key(self) -> &'static str {
        match self {
            Self::ByChapter => "by_surah",
            Self::Inline => "inline",
            Self::Bilingual => "bilingual_interleaved",
            Self::Interactive => "interactive_inline",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn requires_translation(self) -> bool {
        matches!(self, Self::Bilingual | Self::Interactive)
    }

    /// Instantiate the strategy for this layout.
    pub fn strategy(self, options: RenderOptions) -> Box<dyn Layout> {
        match self {
            Self::ByChapter => Box::new(ByChapter::new(options)),
            Self::Inline => Box::new(Inline::new(options)),
            Self::Bilingual => Box::new(Bilingual::new(options)),
            Self::Interactive => Box::new(Interactive::new(options)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub language: String,
    pub show_verse_numbers: bool,
    pub show_invocation: bool,
    /// Inline layout only.
    pub single_document: bool,
    pub translation_language: Option<String>,
    pub translation_direction: TextDirection,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: "ar".to_string(),
            show_verse_numbers: true,
            show_invocation: true,
            single_document: false,
            translation_language: None,
            translation_direction: TextDirection::Ltr,
        }
    }
}

/// A rendered XHTML file destined for `OEBPS/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    pub id: String,
    pub filename: String,
    pub content: Vec<u8>,
    /// `false` keeps the document out of the primary reading order.
    pub linear: bool,
}

impl ContentDocument {
    pub fn linear(id: impl Into<String>, filename: impl Into<String>, content: String) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            content: content.into_bytes(),
            linear: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("{layout} layout requires translated verses, but the corpus has none")]
    MissingTranslation { layout: &'static str },
}

/// How hrefs are formed for verses, pages and chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorScheme {
    /// One `chapter-N.xhtml` per chapter; chapters are addressed by file.
    PerChapter,
    /// Every chapter in `chapters.xhtml`, addressed by `#surah-N`.
    SingleDocument,
}

pub const SINGLE_DOCUMENT_ID: &str = "chapters";

impl AnchorScheme {
    pub fn file_for(self, chapter: u16) -> String {
        match self {
            Self::PerChapter => format!("chapter-{}.xhtml", chapter),
            Self::SingleDocument => format!("{}.xhtml", SINGLE_DOCUMENT_ID),
        }
    }
}

/// The render contract shared by every strategy.
pub trait Layout {
    fn kind(&self) -> LayoutKind;

    fn anchors(&self) -> AnchorScheme;

    /// Content documents in reading order.
    fn render(
        &self,
        corpus: &Corpus,
        markers: &MarkerIndex,
    ) -> Result<Vec<ContentDocument>, LayoutError>;

    fn verse_href(&self, chapter: u16, verse: u16) -> String {
        format!("{}#{}", self.anchors().file_for(chapter), xhtml::verse_id(chapter, verse))
    }

    fn page_href(&self, chapter: u16, page: u16) -> String {
        format!("{}#{}", self.anchors().file_for(chapter), xhtml::page_id(page))
    }

    fn chapter_href(&self, chapter: u16) -> String {
        match self.anchors() {
            AnchorScheme::PerChapter => self.anchors().file_for(chapter),
            AnchorScheme::SingleDocument => {
                format!("{}#{}", self.anchors().file_for(chapter), xhtml::chapter_id(chapter))
            }
        }
    }
}

/// One document per chapter, each wrapping `body(chapter)`.
pub(crate) fn per_chapter_documents(
    corpus: &Corpus,
    options: &RenderOptions,
    body_class: &str,
    mut body: impl FnMut(&crate::model::Chapter) -> String,
) -> Vec<ContentDocument> {
    corpus
        .chapters
        .iter()
        .map(|chapter| {
            let html = xhtml::document(
                &chapter.name_arabic,
                &options.language,
                TextDirection::Rtl.as_str(),
                body_class,
                &body(chapter),
            );
            ContentDocument::linear(
                format!("chapter-{}", chapter.number),
                AnchorScheme::PerChapter.file_for(chapter.number),
                html,
            )
        })
        .collect()
}
