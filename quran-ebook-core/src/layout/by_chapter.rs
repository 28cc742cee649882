//! Verse-by-verse layout: one document per chapter, one paragraph per verse.

use crate::markers::MarkerIndex;
use crate::model::Corpus;

use super::xhtml;
use super::{per_chapter_documents, AnchorScheme, ContentDocument, Layout, LayoutError, LayoutKind, RenderOptions};

pub struct ByChapter {
    options: RenderOptions,
}

impl ByChapter {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Layout for ByChapter {
    fn kind(&self) -> LayoutKind {
        LayoutKind::ByChapter
    }

    fn anchors(&self) -> AnchorScheme {
        AnchorScheme::PerChapter
    }

    fn render(
        &self,
        corpus: &Corpus,
        markers: &MarkerIndex,
    ) -> Result<Vec<ContentDocument>, LayoutError> {
        let options = &self.options;
        Ok(per_chapter_documents(corpus, options, "surah", |chapter| {
            let mut body = format!(
                "<section epub:type=\"chapter\" class=\"surah\" id=\"{}\">\n",
                xhtml::chapter_id(chapter.number)
            );
            body.push_str(&xhtml::chapter_heading(chapter, false));
            body.push_str(&xhtml::invocation(corpus, chapter, options));
            for verse in &chapter.verses {
                body.push_str(&format!(
                    "<p class=\"ayah-line\">{}{}{}{}</p>\n",
                    xhtml::page_break(markers, verse),
                    xhtml::hizb_ornament(markers, verse),
                    xhtml::verse_text(verse),
                    xhtml::verse_marker(verse, options)
                ));
            }
            body.push_str("</section>");
            body
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::compute_markers;
    use crate::model::{Chapter, Revelation, Verse};

    fn corpus() -> Corpus {
        let chapter = |number: u16, texts: &[&str]| Chapter {
            number,
            name_arabic: format!("سورة {}", number),
            name_transliteration: format!("Surah {}", number),
            name_translation: None,
            revelation: Revelation::Meccan,
            verse_count: texts.len() as u16,
            verses: texts
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let mut v = Verse::new(number, i as u16 + 1, *t);
                    v.page = Some(number);
                    v
                })
                .collect(),
        };
        Corpus {
            chapters: vec![chapter(1, &["بسم", "الحمد"]), chapter(2, &["الم", "ذلك"])],
            script: "text_uthmani".to_string(),
            metadata: Default::default(),
            invocation: "بسم".to_string(),
        }
    }

    #[test]
    fn test_one_document_per_chapter() {
        let corpus = corpus();
        let layout = ByChapter::new(RenderOptions::default());
        let docs = layout.render(&corpus, &compute_markers(&corpus)).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].id, "chapter-2");
        assert_eq!(docs[1].filename, "chapter-2.xhtml");
        assert!(docs.iter().all(|d| d.linear));

        let html = String::from_utf8(docs[1].content.clone()).unwrap();
        assert!(html.contains(r#"id="ayah-2-2""#));
        assert!(html.contains(r#"id="page2""#));
        assert!(html.contains("<p class=\"bismillah\">"));
        assert!(html.contains("<span class=\"ayah-number\">٢</span>"));
    }

    fn hizb_count(corpus: &Corpus) -> usize {
        let layout = ByChapter::new(RenderOptions::default());
        let docs = layout.render(corpus, &compute_markers(corpus)).unwrap();
        let html = String::from_utf8(docs[1].content.clone()).unwrap();
        html.matches('۞').count()
    }

    #[test]
    fn test_quarter_start_has_one_ornament() {
        // 2:2 opens the second quarter
        let mut qpc = corpus();
        qpc.script = "qpc_uthmani_hafs".to_string();
        for (i, verse) in qpc.chapters.iter_mut().flat_map(|c| c.verses.iter_mut()).enumerate() {
            verse.hizb_quarter = Some(if i < 3 { 1 } else { 2 });
        }
        assert_eq!(hizb_count(&qpc), 1);

        // Non-QPC text keeps its own mark
        let mut plain = qpc.clone();
        plain.script = "text_uthmani".to_string();
        plain.chapters[1].verses[1].text = "۞ ذلك".to_string();
        assert_eq!(hizb_count(&plain), 1);

        // QPC text had the mark stripped at ingestion
        let mut stripped = corpus();
        stripped.script = "qpc_uthmani_hafs".to_string();
        stripped.chapters[1].verses[0].hizb_marker = true;
        assert_eq!(hizb_count(&stripped), 1);
    }

    #[test]
    fn test_first_chapter_has_no_separate_invocation() {
        let corpus = corpus();
        let layout = ByChapter::new(RenderOptions::default());
        let docs = layout.render(&corpus, &compute_markers(&corpus)).unwrap();
        let html = String::from_utf8(docs[0].content.clone()).unwrap();
        assert!(!html.contains("bismillah"));
    }
}
