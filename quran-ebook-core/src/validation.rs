//! Structural Validation - Rule/Result Separation
//!
//! Rules produce structured violations. Any violation blocks the build:
//! every rule guards a fixed property of the source text, never a preference.

use serde::{Deserialize, Serialize};

use crate::model::{Corpus, CHAPTER_COUNT, VERSE_COUNT};

/// Canonical verse counts per chapter (Hafs reading), index 0 = chapter 1.
pub const VERSE_COUNTS: [u16; CHAPTER_COUNT] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98, 135,
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53,
    89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25, 22, 17, 19, 26,
    30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

/// Reference print edition page range (Madinah Mushaf, 1405 AH).
pub const MIN_PAGE: u16 = 1;
pub const MAX_PAGE: u16 = 604;

/// Shortest plausible opening invocation, in characters.
pub const MIN_INVOCATION_CHARS: usize = 10;

/// Codepoints ingestion must strip from QPC text.
const FORBIDDEN_IN_QPC: &[(char, &str)] = &[('\u{06DE}', "RUB AL-HIZB MARK")];

/// Reference verse count for a chapter number, if it is in range.
pub fn expected_verse_count(chapter: u16) -> Option<u16> {
    let index = usize::from(chapter).checked_sub(1)?;
    VERSE_COUNTS.get(index).copied()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

impl ValidationViolation {
    fn error(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            severity: ViolationSeverity::Error,
            message: message.into(),
            expected: None,
            actual: None,
            remediation: vec![],
        }
    }

    fn expected(mut self, expected: impl ToString, actual: impl ToString) -> Self {
        self.expected = Some(expected.to_string());
        self.actual = Some(actual.to_string());
        self
    }

    fn remediation(mut self, hint: &str) -> Self {
        self.remediation.push(hint.to_string());
        self
    }
}

impl std::fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub script: String,
    pub chapters: usize,
    pub verses: usize,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct ChapterCountRule;

impl ValidationRule for ChapterCountRule {
    fn name(&self) -> &'static str { "chapter_count" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        let actual = corpus.chapters.len();
        if actual == CHAPTER_COUNT {
            return vec![];
        }
        vec![ValidationViolation::error(
            self.name(),
            format!("Chapter count: expected {}, got {}", CHAPTER_COUNT, actual),
        )
        .expected(CHAPTER_COUNT, actual)
        .remediation("Re-fetch the corpus; a chapter was dropped or duplicated upstream")]
    }
}

pub struct ChapterOrderRule;

impl ValidationRule for ChapterOrderRule {
    fn name(&self) -> &'static str { "chapter_order" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        corpus
            .chapters
            .iter()
            .enumerate()
            .filter(|(i, chapter)| usize::from(chapter.number) != i + 1)
            .map(|(i, chapter)| {
                ValidationViolation::error(
                    self.name(),
                    format!(
                        "Chapter at index {} has number {}, expected {}",
                        i,
                        chapter.number,
                        i + 1
                    ),
                )
                .expected(i + 1, chapter.number)
            })
            .collect()
    }
}

pub struct VerseCountRule;

impl ValidationRule for VerseCountRule {
    fn name(&self) -> &'static str { "verse_count" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        let mut total = 0;

        for chapter in &corpus.chapters {
            let actual = chapter.verses.len();
            total += actual;

            if let Some(expected) = expected_verse_count(chapter.number) {
                if actual != usize::from(expected) {
                    violations.push(
                        ValidationViolation::error(
                            self.name(),
                            format!(
                                "Chapter {} ({}): expected {} verses, got {}",
                                chapter.number, chapter.name_transliteration, expected, actual
                            ),
                        )
                        .expected(expected, actual),
                    );
                }
            }
            if actual != usize::from(chapter.verse_count) {
                violations.push(
                    ValidationViolation::error(
                        self.name(),
                        format!(
                            "Chapter {}: declared verse count ({}) disagrees with actual verses ({})",
                            chapter.number, chapter.verse_count, actual
                        ),
                    )
                    .expected(chapter.verse_count, actual),
                );
            }
        }

        if total != VERSE_COUNT {
            violations.push(
                ValidationViolation::error(
                    self.name(),
                    format!("Total verses: expected {}, got {}", VERSE_COUNT, total),
                )
                .expected(VERSE_COUNT, total),
            );
        }
        violations
    }
}

pub struct VerseSequenceRule;

impl ValidationRule for VerseSequenceRule {
    fn name(&self) -> &'static str { "verse_sequence" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for chapter in &corpus.chapters {
            // One report per chapter is enough signal
            let first_gap = chapter
                .verses
                .iter()
                .enumerate()
                .find(|(i, verse)| usize::from(verse.number) != i + 1);
            if let Some((i, verse)) = first_gap {
                violations.push(
                    ValidationViolation::error(
                        self.name(),
                        format!(
                            "Chapter {} verse at index {}: expected number {}, got {}",
                            chapter.number,
                            i,
                            i + 1,
                            verse.number
                        ),
                    )
                    .expected(i + 1, verse.number),
                );
            }
        }
        violations
    }
}

pub struct EmptyTextRule;

impl ValidationRule for EmptyTextRule {
    fn name(&self) -> &'static str { "empty_text" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        corpus
            .verses()
            .filter(|v| v.text.trim().is_empty())
            .map(|v| {
                ValidationViolation::error(
                    self.name(),
                    format!("{}:{} has empty text", v.chapter, v.number),
                )
            })
            .collect()
    }
}

pub struct PageNumberRule;

impl ValidationRule for PageNumberRule {
    fn name(&self) -> &'static str { "page_numbers" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        let mut prev_page = 0;

        for verse in corpus.verses() {
            let Some(page) = verse.page else { continue };

            if !(MIN_PAGE..=MAX_PAGE).contains(&page) {
                violations.push(
                    ValidationViolation::error(
                        self.name(),
                        format!(
                            "{}:{} has page number {} (expected {}-{})",
                            verse.chapter, verse.number, page, MIN_PAGE, MAX_PAGE
                        ),
                    )
                    .expected(format!("{}-{}", MIN_PAGE, MAX_PAGE), page),
                );
            }
            if page < prev_page {
                violations.push(
                    ValidationViolation::error(
                        self.name(),
                        format!(
                            "Page number decreased: {} -> {} at {}:{}",
                            prev_page, page, verse.chapter, verse.number
                        ),
                    )
                    .expected(format!(">= {}", prev_page), page),
                );
            }
            prev_page = page;
        }
        violations
    }
}

pub struct InvocationRule;

impl ValidationRule for InvocationRule {
    fn name(&self) -> &'static str { "invocation" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        if corpus.invocation.chars().count() < MIN_INVOCATION_CHARS {
            violations.push(
                ValidationViolation::error(
                    self.name(),
                    "Opening invocation text is missing or suspiciously short",
                )
                .expected(format!(">= {} characters", MIN_INVOCATION_CHARS), corpus.invocation.chars().count()),
            );
        }
        let first = corpus.chapters.first().and_then(|c| c.verses.first());
        if let Some(first) = first {
            if first.text != corpus.invocation {
                violations.push(
                    ValidationViolation::error(
                        self.name(),
                        "Opening invocation text doesn't match chapter 1 verse 1",
                    )
                    .remediation("Take the invocation from 1:1 of the same script encoding"),
                );
            }
        }
        violations
    }
}

pub struct ForbiddenCodepointRule;

impl ValidationRule for ForbiddenCodepointRule {
    fn name(&self) -> &'static str { "forbidden_codepoints" }

    fn validate(&self, corpus: &Corpus) -> Vec<ValidationViolation> {
        if !corpus.is_qpc() {
            return vec![];
        }
        let mut violations = vec![];
        for verse in corpus.verses() {
            for (cp, desc) in FORBIDDEN_IN_QPC {
                if verse.text.contains(*cp) {
                    violations.push(
                        ValidationViolation::error(
                            self.name(),
                            format!(
                                "{}:{} contains U+{:04X} {}",
                                verse.chapter, verse.number, u32::from(*cp), desc
                            ),
                        )
                        .remediation("Ingestion must strip this marker; fix the loader, not the data"),
                    );
                }
            }
        }
        violations
    }
}

/// Validator runs every rule and accumulates their violations
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ChapterCountRule),
                Box::new(ChapterOrderRule),
                Box::new(VerseCountRule),
                Box::new(VerseSequenceRule),
                Box::new(EmptyTextRule),
                Box::new(PageNumberRule),
                Box::new(InvocationRule),
                Box::new(ForbiddenCodepointRule),
            ],
        }
    }

    pub fn validate(&self, corpus: &Corpus) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(corpus))
            .collect();
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        ValidationResult {
            valid,
            violations,
            script: corpus.script.clone(),
            chapters: corpus.chapters.len(),
            verses: corpus.total_verses(),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every structural check. Never mutates, never short-circuits.
pub fn validate(corpus: &Corpus) -> Vec<ValidationViolation> {
    Validator::new().validate(corpus).violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chapter, Revelation, Verse};

    fn small_corpus(script: &str) -> Corpus {
        let invocation = "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ".to_string();
        let verses = (1..=7)
            .map(|n| {
                let text = if n == 1 { invocation.clone() } else { format!("آية {}", n) };
                let mut v = Verse::new(1, n, text);
                v.page = Some(1);
                v
            })
            .collect();
        Corpus {
            chapters: vec![Chapter {
                number: 1,
                name_arabic: "الفاتحة".to_string(),
                name_transliteration: "Al-Fatihah".to_string(),
                name_translation: None,
                revelation: Revelation::Meccan,
                verse_count: 7,
                verses,
            }],
            script: script.to_string(),
            metadata: Default::default(),
            invocation,
        }
    }

    #[test]
    fn test_reference_table_total() {
        let total: usize = VERSE_COUNTS.iter().map(|&c| usize::from(c)).sum();
        assert_eq!(total, VERSE_COUNT);
        assert_eq!(expected_verse_count(1), Some(7));
        assert_eq!(expected_verse_count(112), Some(4));
        assert_eq!(expected_verse_count(0), None);
        assert_eq!(expected_verse_count(115), None);
    }

    #[test]
    fn test_truncated_corpus_reports_count() {
        let violations = ChapterCountRule.validate(&small_corpus("text_uthmani"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Chapter count: expected 114, got 1");
    }

    #[test]
    fn test_swapped_chapters_report_each_index() {
        let mut corpus = small_corpus("text_uthmani");
        let mut second = corpus.chapters[0].clone();
        second.number = 2;
        let mut third = second.clone();
        third.number = 3;
        corpus.chapters.push(second);
        corpus.chapters.push(third);
        assert!(ChapterOrderRule.validate(&corpus).is_empty());

        corpus.chapters.swap(0, 2);
        let violations = ChapterOrderRule.validate(&corpus);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.rule == "chapter_order"));
        assert_eq!(violations[0].message, "Chapter at index 0 has number 3, expected 1");
        assert_eq!(violations[0].expected.as_deref(), Some("1"));
        assert_eq!(violations[0].actual.as_deref(), Some("3"));
        assert_eq!(violations[1].expected.as_deref(), Some("3"));
        assert_eq!(violations[1].actual.as_deref(), Some("1"));

        let result = Validator::new().validate(&corpus);
        assert!(result.violations.iter().any(|v| v.rule == "chapter_order"));
    }

    #[test]
    fn test_sequence_stops_at_first_gap() {
        let mut corpus = small_corpus("text_uthmani");
        corpus.chapters[0].verses[2].number = 9;
        corpus.chapters[0].verses[4].number = 11;
        let violations = VerseSequenceRule.validate(&corpus);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("expected number 3, got 9"));
    }

    #[test]
    fn test_declared_count_mismatch() {
        let mut corpus = small_corpus("text_uthmani");
        corpus.chapters[0].verse_count = 6;
        let violations = VerseCountRule.validate(&corpus);
        assert!(violations.iter().any(|v| v.message.contains("declared verse count (6)")));
    }

    #[test]
    fn test_page_out_of_range_and_decreasing() {
        let mut corpus = small_corpus("text_uthmani");
        corpus.chapters[0].verses[1].page = Some(700);
        corpus.chapters[0].verses[2].page = Some(2);
        let violations = PageNumberRule.validate(&corpus);
        assert!(violations.iter().any(|v| v.message.contains("page number 700")));
        assert!(violations.iter().any(|v| v.message.contains("decreased: 700 -> 2")));
    }

    #[test]
    fn test_missing_pages_are_not_violations() {
        let mut corpus = small_corpus("text_uthmani");
        for v in &mut corpus.chapters[0].verses {
            v.page = None;
        }
        assert!(PageNumberRule.validate(&corpus).is_empty());
    }

    #[test]
    fn test_empty_text() {
        let mut corpus = small_corpus("text_uthmani");
        corpus.chapters[0].verses[3].text = "  \u{a0} ".to_string();
        let violations = EmptyTextRule.validate(&corpus);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "1:4 has empty text");
    }

    #[test]
    fn test_invocation_mismatch() {
        let mut corpus = small_corpus("text_uthmani");
        corpus.invocation = "short".to_string();
        let violations = InvocationRule.validate(&corpus);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_forbidden_codepoint_only_for_qpc() {
        let mut corpus = small_corpus("text_uthmani");
        corpus.chapters[0].verses[5].text.push('\u{06DE}');
        assert!(ForbiddenCodepointRule.validate(&corpus).is_empty());

        corpus.script = "qpc_uthmani_hafs".to_string();
        let violations = ForbiddenCodepointRule.validate(&corpus);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("U+06DE"));
    }

    #[test]
    fn test_validator_accumulates() {
        let mut corpus = small_corpus("qpc_uthmani_hafs");
        corpus.chapters[0].verses[3].text = String::new();
        let result = Validator::new().validate(&corpus);
        assert!(!result.valid);
        assert!(result.has_errors());
        let rules: Vec<_> = result.violations.iter().map(|v| v.rule.as_str()).collect();
        assert!(rules.contains(&"chapter_count"));
        assert!(rules.contains(&"verse_count"));
        assert!(rules.contains(&"empty_text"));
    }
}
