//! Bilingual verse-by-verse layout
//!
//! Each verse is followed by its translation. Footnote references link into
//! one shared annotations document holding every footnote exactly once.

use std::collections::HashSet;

use crate::markers::MarkerIndex;
use crate::model::Corpus;

use super::annotations;
use super::xhtml;
use super::{per_chapter_documents, AnchorScheme, ContentDocument, Layout, LayoutError, LayoutKind, RenderOptions};

pub struct Bilingual {
    options: RenderOptions,
}

impl Bilingual {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Layout for Bilingual {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Bilingual
    }

    fn anchors(&self) -> AnchorScheme {
        AnchorScheme::PerChapter
    }

    fn render(
        &self,
        corpus: &Corpus,
        markers: &MarkerIndex,
    ) -> Result<Vec<ContentDocument>, LayoutError> {
        if !corpus.has_translation() {
            return Err(LayoutError::MissingTranslation { layout: self.kind().key() });
        }
        let options = &self.options;
        let footnotes = annotations::collect_footnotes(corpus);
        let known: HashSet<u64> = footnotes.iter().map(|f| f.id).collect();
        let lang = options.translation_language.as_deref().unwrap_or("en");
        let dir = options.translation_direction.as_str();

        let mut documents = per_chapter_documents(corpus, options, "surah bilingual", |chapter| {
            let mut body = format!(
                "<section epub:type=\"chapter\" class=\"surah\" id=\"{}\">\n",
                xhtml::chapter_id(chapter.number)
            );
            body.push_str(&xhtml::chapter_heading(chapter, true));
            body.push_str(&xhtml::invocation(corpus, chapter, options));

            for verse in &chapter.verses {
                body.push_str("<div class=\"ayah-block\">\n");
                body.push_str(&format!(
                    "  <p class=\"ayah-arabic\">{}{}{}{}</p>\n",
                    xhtml::page_break(markers, verse),
                    xhtml::hizb_ornament(markers, verse),
                    xhtml::verse_text(verse),
                    xhtml::verse_marker(verse, options)
                ));
                if let Some(translation) = &verse.translation {
                    body.push_str(&format!(
                        "  <p class=\"ayah-translation\" lang=\"{}\" xml:lang=\"{}\" dir=\"{}\"><span class=\"ayah-ref\">{}:{}</span> {}</p>\n",
                        xhtml::escape(lang),
                        xhtml::escape(lang),
                        dir,
                        verse.chapter,
                        verse.number,
                        annotations::link_footnotes(translation, &known)
                    ));
                }
                body.push_str("</div>\n");
            }
            body.push_str("</section>");
            body
        });

        if !footnotes.is_empty() {
            documents.push(annotations::footnotes_document(&footnotes, options));
        }
        tracing::debug!(footnotes = footnotes.len(), "Rendered bilingual chapters");
        Ok(documents)
    }
}
