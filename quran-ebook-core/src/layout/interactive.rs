//! Interactive continuous-flow layout
//!
//! Arabic runs as prose; tapping a verse number pops up its translation.
//! Each pop-up is an aside in the annotations document with every link
//! flattened out of it.

use crate::markers::MarkerIndex;
use crate::model::{Corpus, Verse};

use super::annotations::{self, ANNOTATIONS_FILE};
use super::xhtml;
use super::{per_chapter_documents, AnchorScheme, ContentDocument, Layout, LayoutError, LayoutKind, RenderOptions};

pub struct Interactive {
    options: RenderOptions,
}

impl Interactive {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Verse number that links to the verse's translation note.
    fn verse_marker(&self, verse: &Verse) -> String {
        if verse.translation.is_none() {
            return xhtml::verse_marker(verse, &self.options);
        }
        if !self.options.show_verse_numbers {
            return String::new();
        }
        format!(
            " <a epub:type=\"noteref\" href=\"{}#{}\" class=\"ayah-number\">{}</a>",
            ANNOTATIONS_FILE,
            annotations::note_id(verse.chapter, verse.number),
            xhtml::arabic_numerals(verse.number)
        )
    }
}

impl Layout for Interactive {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Interactive
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

        let mut documents =
            per_chapter_documents(corpus, options, "surah interactive", |chapter| {
                let mut body = format!(
                    "<section epub:type=\"chapter\" class=\"surah\" id=\"{}\">\n",
                    xhtml::chapter_id(chapter.number)
                );
                body.push_str(&xhtml::chapter_heading(chapter, true));
                body.push_str(&xhtml::invocation(corpus, chapter, options));
                body.push_str("<p class=\"surah-text\">");
                for verse in &chapter.verses {
                    body.push_str(&format!(
                        "{}{}{}{} ",
                        xhtml::page_break(markers, verse),
                        xhtml::hizb_ornament(markers, verse),
                        xhtml::verse_text(verse),
                        self.verse_marker(verse)
                    ));
                }
                body.push_str("</p>\n</section>");
                body
            });

        // Notes in reading order; a verse without translation has no note
        let notes: Vec<String> = corpus.verses().filter_map(annotations::translation_note).collect();
        tracing::debug!(notes = notes.len(), "Rendered interactive chapters");
        documents.push(annotations::notes_document(&notes, options));
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::compute_markers;
    use crate::model::{Chapter, Footnote, Revelation};

    fn corpus() -> Corpus {
        let mut first = Verse::new(2, 1, "الم");
        first.translation = Some(
            r#"Alif, Lam, Meem<a epub:type="noteref" href="endnotes.xhtml#fn-3" class="noteref">1</a>"#
                .to_string(),
        );
        first.footnotes.push(Footnote { id: 3, number: 1, text: "Disjoined letters.".to_string() });
        let second = Verse::new(2, 2, "ذلك");
        Corpus {
            chapters: vec![Chapter {
                number: 2,
                name_arabic: "البقرة".to_string(),
                name_transliteration: "Al-Baqarah".to_string(),
                name_translation: Some("The Cow".to_string()),
                revelation: Revelation::Medinan,
                verse_count: 2,
                verses: vec![first, second],
            }],
            script: "text_uthmani".to_string(),
            metadata: Default::default(),
            invocation: "بسم".to_string(),
        }
    }

    #[test]
    fn test_verse_numbers_link_to_notes() {
        let corpus = corpus();
        let layout = Interactive::new(RenderOptions::default());
        let docs = layout.render(&corpus, &compute_markers(&corpus)).unwrap();
        assert_eq!(docs.len(), 2);

        let chapter = String::from_utf8(docs[0].content.clone()).unwrap();
        assert!(chapter.contains(r#"href="endnotes.xhtml#tn-2-1""#));
        // untranslated verse keeps a plain marker
        assert!(!chapter.contains("tn-2-2"));
        assert!(chapter.contains("<span class=\"ayah-number\">٢</span>"));

        let notes = String::from_utf8(docs[1].content.clone()).unwrap();
        assert!(notes.contains(r#"id="tn-2-1""#));
        assert!(notes.contains("Disjoined letters."));
        assert!(!notes.contains("<a "));
    }
}
