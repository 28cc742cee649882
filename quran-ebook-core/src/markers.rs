//! Marker Computation - page, juz and quarter boundaries
//!
//! A pure forward pass producing an index keyed by (chapter, verse).
//! The corpus itself is never annotated.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::Corpus;

pub type VerseKey = (u16, u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuzBoundary {
    pub juz: u8,
    pub chapter: u16,
    pub verse: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMarker {
    pub page: u16,
    pub chapter: u16,
    pub verse: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerIndex {
    pages: BTreeMap<VerseKey, u16>,
    page_order: Vec<PageMarker>,
    juz: Vec<JuzBoundary>,
    quarters: BTreeSet<VerseKey>,
}

impl MarkerIndex {
    /// Page that starts at this verse, if any.
    pub fn page_marker(&self, chapter: u16, verse: u16) -> Option<u16> {
        self.pages.get(&(chapter, verse)).copied()
    }

    /// Page markers in reading order.
    pub fn page_markers(&self) -> &[PageMarker] {
        &self.page_order
    }

    pub fn juz_boundaries(&self) -> &[JuzBoundary] {
        &self.juz
    }

    pub fn is_quarter_start(&self, chapter: u16, verse: u16) -> bool {
        self.quarters.contains(&(chapter, verse))
    }

    /// No pagination data: page-list navigation is unavailable.
    pub fn has_pages(&self) -> bool {
        !self.page_order.is_empty()
    }
}

/// Walk the corpus once, recording every transition.
pub fn compute_markers(corpus: &Corpus) -> MarkerIndex {
    let mut index = MarkerIndex::default();
    let mut prev_page = None;
    let mut prev_juz = None;
    let mut prev_quarter = None;

    for verse in corpus.verses() {
        let key = (verse.chapter, verse.number);

        if let Some(page) = verse.page {
            if prev_page != Some(page) {
                index.pages.insert(key, page);
                index.page_order.push(PageMarker {
                    page,
                    chapter: verse.chapter,
                    verse: verse.number,
                });
                prev_page = Some(page);
            }
        }

        if let Some(juz) = verse.juz {
            if prev_juz != Some(juz) {
                index.juz.push(JuzBoundary {
                    juz,
                    chapter: verse.chapter,
                    verse: verse.number,
                });
                prev_juz = Some(juz);
            }
        }

        if let Some(quarter) = verse.hizb_quarter {
            // 1:1 opens the first quarter; only later transitions get an ornament
            if prev_quarter.is_some() && prev_quarter != Some(quarter) {
                index.quarters.insert(key);
            }
            prev_quarter = Some(quarter);
        }
    }

    tracing::debug!(
        pages = index.page_order.len(),
        juz = index.juz.len(),
        quarters = index.quarters.len(),
        "Computed markers"
    );
    index
}
