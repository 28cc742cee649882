//! Shared fixtures: a synthetic but structurally valid corpus and
//! in-memory collaborators.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::io::{Cursor, Read};
use std::rc::Rc;

use quran_ebook_core::{
    config::{BuildConfig, TranslationConfig},
    model::{DEFAULT_INVOCATION, VERSE_COUNT},
    registry::FontInfo,
    validation::VERSE_COUNTS,
    BuildPipeline, Chapter, Corpus, CorpusSource, Footnote, FontResolver, Revelation,
    SourceError, Verse,
};

pub const MAX_PAGE: usize = 604;

/// 114 chapters, 6236 verses, pages spread evenly over 1..=604,
/// 30 juz and 240 quarters.
pub fn corpus() -> Corpus {
    let mut index = 0usize;
    let chapters = VERSE_COUNTS
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let number = i as u16 + 1;
            let verses = (1..=count)
                .map(|n| {
                    let text = if number == 1 && n == 1 {
                        DEFAULT_INVOCATION.to_string()
                    } else {
                        format!("آية {} من سورة {}", n, number)
                    };
                    let mut verse = Verse::new(number, n, text);
                    verse.page = Some((1 + index * MAX_PAGE / VERSE_COUNT) as u16);
                    verse.juz = Some((1 + index * 30 / VERSE_COUNT) as u8);
                    verse.hizb_quarter = Some((1 + index * 240 / VERSE_COUNT) as u16);
                    index += 1;
                    verse
                })
                .collect();
            Chapter {
                number,
                name_arabic: format!("سورة {}", number),
                name_transliteration: format!("Surah {}", number),
                name_translation: None,
                revelation: if number % 2 == 0 { Revelation::Medinan } else { Revelation::Meccan },
                verse_count: count,
                verses,
            }
        })
        .collect();

    Corpus {
        chapters,
        script: "qpc_uthmani_hafs".to_string(),
        metadata: Default::default(),
        invocation: DEFAULT_INVOCATION.to_string(),
    }
}

/// Every verse translated; 2:255 carries footnote 5.
pub fn translated_corpus() -> Corpus {
    let mut corpus = corpus();
    for chapter in &mut corpus.chapters {
        chapter.name_translation = Some(format!("Chapter {}", chapter.number));
        for verse in &mut chapter.verses {
            verse.translation = Some(format!("Translation of {}:{}", verse.chapter, verse.number));
        }
    }
    let verse = &mut corpus.chapters[1].verses[254];
    verse.translation = Some(
        r#"Allah<a epub:type="noteref" href="endnotes.xhtml#fn-5" class="noteref">1</a> - there is no deity except Him"#
            .to_string(),
    );
    verse.footnotes.push(Footnote {
        id: 5,
        number: 1,
        text: "The Throne Verse.".to_string(),
    });
    corpus
}

/// Hands out a fixed corpus and counts how often it was asked.
pub struct MemorySource {
    corpus: Corpus,
    pub loads: Rc<Cell<usize>>,
}

impl MemorySource {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            loads: Rc::new(Cell::new(0)),
        }
    }
}

impl CorpusSource for MemorySource {
    fn load(
        &self,
        script: &str,
        translation: Option<&TranslationConfig>,
    ) -> Result<Corpus, SourceError> {
        self.loads.set(self.loads.get() + 1);
        if let Some(t) = translation {
            if !self.corpus.has_translation() {
                return Err(SourceError::MissingTranslation { resource_id: t.resource_id });
            }
        }
        let mut corpus = self.corpus.clone();
        corpus.script = script.to_string();
        Ok(corpus)
    }
}

pub struct MemoryFonts;

impl FontResolver for MemoryFonts {
    fn resolve(&self, font: &FontInfo) -> Result<Vec<u8>, SourceError> {
        Ok(format!("font:{}", font.key).into_bytes())
    }
}

pub fn pinned_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// Pipeline over `corpus` plus a handle on its load counter.
pub fn pipeline(corpus: Corpus) -> (BuildPipeline, Rc<Cell<usize>>) {
    let source = MemorySource::new(corpus);
    let loads = Rc::clone(&source.loads);
    (
        BuildPipeline::new(source, MemoryFonts).with_modified(pinned_time()),
        loads,
    )
}

pub fn config(structure: &str, translated: bool) -> BuildConfig {
    let mut config = BuildConfig::default();
    config.layout.structure = structure.to_string();
    if translated {
        config.translation = Some(TranslationConfig::default());
    }
    config
}

/// Entry names and contents of a packaged EPUB, in archive order.
pub fn unzip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = vec![];
            entry.read_to_end(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}
