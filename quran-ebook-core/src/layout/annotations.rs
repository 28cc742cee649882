//! End-of-book annotations: footnotes and per-verse translation notes
//!
//! Lives in one non-linear document. Note bodies never carry links, since
//! the reading surface that pops them up cannot follow nested links.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::model::{Corpus, Footnote, Verse};

use super::xhtml;
use super::{ContentDocument, RenderOptions};

pub const ANNOTATIONS_ID: &str = "endnotes";
pub const ANNOTATIONS_FILE: &str = "endnotes.xhtml";

fn noteref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r##"(?is)<a\s[^>]*href="[^"#]*#fn-(\d+)"[^>]*>(.*?)</a>"##).expect("valid regex")
    })
}

fn any_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?is)<a\b[^>]*>(.*?)</a>"#).expect("valid regex"))
}

pub fn footnote_id(id: u64) -> String {
    format!("fn-{}", id)
}

pub fn note_id(chapter: u16, verse: u16) -> String {
    format!("tn-{}-{}", chapter, verse)
}

/// Every footnote in the corpus, deduplicated by id, first-seen order.
pub fn collect_footnotes(corpus: &Corpus) -> Vec<&Footnote> {
    let mut seen = HashSet::new();
    corpus
        .verses()
        .flat_map(|v| v.footnotes.iter())
        .filter(|f| seen.insert(f.id))
        .collect()
}

/// Point every footnote reference at the shared annotations document.
/// References to footnotes that were never collected are unlinked.
pub fn link_footnotes(text: &str, known: &HashSet<u64>) -> String {
    noteref_pattern()
        .replace_all(text, |caps: &regex::Captures| {
            let linked = caps[1].parse::<u64>().ok().filter(|id| known.contains(id));
            match linked {
                Some(id) => format!(
                    r#"<a epub:type="noteref" href="{}#{}" class="noteref">{}</a>"#,
                    ANNOTATIONS_FILE,
                    footnote_id(id),
                    &caps[2]
                ),
                None => format!("<sup>{}</sup>", &caps[2]),
            }
        })
        .into_owned()
}

/// Flatten all link markup: footnote references become superscripts,
/// any other link becomes emphasis.
pub fn flatten_links(text: &str) -> String {
    let refs = noteref_pattern().replace_all(text, "<sup>$2</sup>");
    any_link_pattern().replace_all(&refs, "<em>$1</em>").into_owned()
}

/// Annotations document of footnote asides.
pub fn footnotes_document(footnotes: &[&Footnote], options: &RenderOptions) -> ContentDocument {
    let mut body = String::from("<section epub:type=\"endnotes\" class=\"endnotes\">\n");
    for footnote in footnotes {
        body.push_str(&format!(
            "<aside epub:type=\"footnote\" id=\"{}\" class=\"footnote\">\n  <p><sup>{}</sup> {}</p>\n</aside>\n",
            footnote_id(footnote.id),
            footnote.number,
            flatten_links(&footnote.text)
        ));
    }
    body.push_str("</section>");
    annotations_document(options, &body)
}

/// One translation note for a verse, with its footnotes inlined.
/// The only place translation text enters a note body.
pub fn translation_note(verse: &Verse) -> Option<String> {
    let translation = verse.translation.as_deref()?;
    let mut note = format!(
        "<aside epub:type=\"footnote\" id=\"{}\" class=\"translation-note\">\n  <p><span class=\"note-ref\">{}:{}</span> {}</p>\n",
        note_id(verse.chapter, verse.number),
        verse.chapter,
        verse.number,
        flatten_links(translation)
    );
    for footnote in &verse.footnotes {
        note.push_str(&format!(
            "  <p class=\"footnote-inline\"><sup>{}</sup> {}</p>\n",
            footnote.number,
            flatten_links(&footnote.text)
        ));
    }
    note.push_str("</aside>\n");
    Some(note)
}

pub fn notes_document(notes: &[String], options: &RenderOptions) -> ContentDocument {
    let body = format!(
        "<section epub:type=\"endnotes\" class=\"endnotes\">\n{}</section>",
        notes.concat()
    );
    annotations_document(options, &body)
}

fn annotations_document(options: &RenderOptions, body: &str) -> ContentDocument {
    let lang = options.translation_language.as_deref().unwrap_or(&options.language);
    let html = xhtml::document(
        "Notes",
        lang,
        options.translation_direction.as_str(),
        "endnotes",
        body,
    );
    ContentDocument {
        id: ANNOTATIONS_ID.to_string(),
        filename: ANNOTATIONS_FILE.to_string(),
        content: html.into_bytes(),
        linear: false,
    }
}
