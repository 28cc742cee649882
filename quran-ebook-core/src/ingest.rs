//! Ingestion clean-up for raw source records.
//!
//! QPC encodings carry presentation artifacts (inline verse numbers, the
//! rub-al-hizb mark) that the layouts draw themselves.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::layout::ANNOTATIONS_FILE;
use crate::model::Footnote;

pub const RUB_AL_HIZB: char = '\u{06DE}';
pub const SAJDAH_SIGN: char = '\u{06E9}';
const HAIR_SPACE: char = '\u{200A}';

fn trailing_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // 2:72 uses a plain space where every other verse has NBSP
    PATTERN.get_or_init(|| Regex::new(r"[\x{00A0} ][\x{0660}-\x{0669}]+$").expect("valid regex"))
}

fn rub_al_hizb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\x{06DE}\x{00A0}?").expect("valid regex"))
}

fn footnote_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<sup\s+foot_note=["']?(\d+)["']?\s*>(\d+)</sup>"#).expect("valid regex")
    })
}

/// Source text carries the rub-al-hizb mark.
pub fn has_hizb_mark(text: &str) -> bool {
    text.contains(RUB_AL_HIZB)
}

/// Strip inline verse numbers and the rub-al-hizb mark; separate the sajdah
/// sign from the verse marker that follows it.
pub fn clean_qpc_text(text: &str) -> String {
    let text = trailing_number_pattern().replace(text, "");
    let text = rub_al_hizb_pattern().replace_all(&text, "");
    text.replace(SAJDAH_SIGN, &format!("{}{}", SAJDAH_SIGN, HAIR_SPACE))
}

/// Rewrite `<sup foot_note=ID>N</sup>` markers as noteref links and collect
/// the referenced footnotes in order of appearance.
pub fn process_translation(
    text: &str,
    foot_notes: &BTreeMap<String, String>,
) -> (String, Vec<Footnote>) {
    let mut footnotes = vec![];
    let processed = footnote_marker_pattern().replace_all(text, |caps: &regex::Captures| {
        let (id, number) = match (caps[1].parse::<u64>(), caps[2].parse::<u32>()) {
            (Ok(id), Ok(number)) => (id, number),
            _ => return caps[0].to_string(),
        };
        footnotes.push(Footnote {
            id,
            number,
            text: foot_notes.get(&caps[1]).cloned().unwrap_or_default(),
        });
        format!(
            r#"<a epub:type="noteref" href="{}#fn-{}" class="noteref">{}</a>"#,
            ANNOTATIONS_FILE, id, number
        )
    });
    (processed.into_owned(), footnotes)
}
