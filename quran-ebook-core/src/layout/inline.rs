//! Continuous-flow layout
//!
//! Verses run together as prose. By default each chapter is its own file, so
//! the file boundary forces a page break on the reader. `single_document`
//! concatenates every chapter into one file addressed by `#surah-N`.

use crate::markers::MarkerIndex;
use crate::model::{Chapter, Corpus};
use crate::registry::TextDirection;

use super::xhtml;
use super::{
    per_chapter_documents, AnchorScheme, ContentDocument, Layout, LayoutError, LayoutKind,
    RenderOptions, SINGLE_DOCUMENT_ID,
};

pub struct Inline {
    options: RenderOptions,
}

impl Inline {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

/// Chapter section of running verse text.
fn chapter_section(
    corpus: &Corpus,
    chapter: &Chapter,
    markers: &MarkerIndex,
    options: &RenderOptions,
) -> String {
    let mut body = format!(
        "<section epub:type=\"chapter\" class=\"surah\" id=\"{}\">\n",
        xhtml::chapter_id(chapter.number)
    );
    body.push_str(&xhtml::chapter_heading(chapter, false));
    body.push_str(&xhtml::invocation(corpus, chapter, options));
    body.push_str("<p class=\"surah-text\">");
    for verse in &chapter.verses {
        body.push_str(&format!(
            "{}{}{}{} ",
            xhtml::page_break(markers, verse),
            xhtml::hizb_ornament(markers, verse),
            xhtml::verse_text(verse),
            xhtml::verse_marker(verse, options)
        ));
    }
    body.push_str("</p>\n</section>\n");
    body
}

impl Layout for Inline {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Inline
    }

    fn anchors(&self) -> AnchorScheme {
        if self.options.single_document {
            AnchorScheme::SingleDocument
        } else {
            AnchorScheme::PerChapter
        }
    }

    fn render(
        &self,
        corpus: &Corpus,
        markers: &MarkerIndex,
    ) -> Result<Vec<ContentDocument>, LayoutError> {
        let options = &self.options;
        if !options.single_document {
            return Ok(per_chapter_documents(corpus, options, "surah inline", |chapter| {
                chapter_section(corpus, chapter, markers, options)
            }));
        }

        let body: String = corpus
            .chapters
            .iter()
            .map(|chapter| chapter_section(corpus, chapter, markers, options))
            .collect();
        let html = xhtml::document(
            &corpus.chapters.first().map(|c| c.name_arabic.clone()).unwrap_or_default(),
            &options.language,
            TextDirection::Rtl.as_str(),
            "surah inline",
            &body,
        );
        Ok(vec![ContentDocument::linear(
            SINGLE_DOCUMENT_ID,
            AnchorScheme::SingleDocument.file_for(1),
            html,
        )])
    }
}
