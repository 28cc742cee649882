//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

mod common;

use regex::Regex;
use std::collections::{HashMap, HashSet};

use quran_ebook_core::{
    config::ConfigConflict, layout::LayoutKind, validate, BuildOutput, PipelineError,
};

fn text(output: &BuildOutput, path: &str) -> String {
    String::from_utf8(output.documents.get(path).unwrap().to_vec()).unwrap()
}

fn content_paths(output: &BuildOutput, prefix: &str) -> Vec<String> {
    output
        .documents
        .paths()
        .filter(|p| p.starts_with(prefix))
        .map(str::to_string)
        .collect()
}

/// Every href in every packaged XHTML document resolves to an existing file
/// and, when it carries a fragment, to an id inside that file.
fn assert_hrefs_resolve(output: &BuildOutput) {
    let entries = common::unzip(&output.bytes);
    let id_pattern = Regex::new(r#"\sid="([^"]+)""#).unwrap();
    let href_pattern = Regex::new(r#"href="([^"]+)""#).unwrap();

    let files: HashMap<String, String> = entries
        .iter()
        .filter_map(|(name, bytes)| {
            let relative = name.strip_prefix("OEBPS/")?;
            Some((relative.to_string(), String::from_utf8_lossy(bytes).into_owned()))
        })
        .collect();
    let ids: HashMap<&str, HashSet<&str>> = files
        .iter()
        .map(|(name, content)| {
            let ids = id_pattern
                .captures_iter(content)
                .map(|c| c.get(1).unwrap().as_str())
                .collect();
            (name.as_str(), ids)
        })
        .collect();

    let mut checked = 0;
    for (name, content) in files.iter().filter(|(n, _)| n.ends_with(".xhtml") || n.ends_with(".opf")) {
        for caps in href_pattern.captures_iter(content) {
            let href = &caps[1];
            let (file, fragment) = match href.split_once('#') {
                Some((file, fragment)) => (file, Some(fragment)),
                None => (href, None),
            };
            assert!(ids.contains_key(file), "{}: href {} names a missing file", name, href);
            if let Some(fragment) = fragment {
                assert!(
                    ids[file].contains(fragment),
                    "{}: href {} names a missing id",
                    name,
                    href
                );
            }
            checked += 1;
        }
    }
    assert!(checked > 114, "expected navigation links, checked only {}", checked);
}

#[test]
fn invariant_valid_corpus_has_no_violations() {
    let corpus = common::corpus();
    assert_eq!(corpus.chapters.len(), 114);
    assert_eq!(corpus.total_verses(), 6236);
    for chapter in &corpus.chapters {
        for (i, verse) in chapter.verses.iter().enumerate() {
            assert_eq!(usize::from(verse.number), i + 1);
        }
    }
    assert_eq!(corpus.chapters[0].verses[0].text, corpus.invocation);
    assert!(validate(&corpus).is_empty());
}

#[test]
fn invariant_validation_is_read_only_and_accumulates() {
    let mut corpus = common::corpus();
    corpus.chapters[2].verses[3].page = Some(605);
    corpus.chapters[3].verses[0].text = "   ".to_string();
    let before = corpus.clone();

    let violations = validate(&corpus);
    assert_eq!(corpus, before);
    let rules: HashSet<&str> = violations.iter().map(|v| v.rule.as_str()).collect();
    assert!(rules.contains("page_numbers"), "{:?}", rules);
    assert!(rules.contains("empty_text"), "{:?}", rules);
}

#[test]
fn invariant_build_calls_validate() {
    let mut corpus = common::corpus();
    corpus.chapters[0].verses[0].text = "ٱلْحَمْدُ لِلَّهِ".to_string();
    let (pipeline, _) = common::pipeline(corpus);

    match pipeline.build(&common::config("by_surah", false)) {
        Err(PipelineError::ValidationFailed(violations)) => {
            assert!(violations.iter().any(|v| v.rule == "invocation"));
        }
        other => panic!("expected validation failure, got {:?}", other.map(|o| o.filename)),
    }
}

#[test]
fn scenario_a_per_chapter_build() {
    let (pipeline, _) = common::pipeline(common::corpus());
    let output = pipeline.build(&common::config("by_surah", false)).unwrap();

    assert!(output.validation.violations.is_empty());
    assert_eq!(output.layout, LayoutKind::ByChapter);
    assert_eq!(content_paths(&output, "OEBPS/chapter-").len(), 114);
    assert!(output.documents.get("OEBPS/cover.xhtml").is_some());
    assert!(output.documents.get("OEBPS/toc.xhtml").is_some());
    assert!(output.documents.get("OEBPS/endnotes.xhtml").is_none());
    assert_eq!(output.filename, "quran_hafs_qpc_kfgqpc_ayah_ar.epub");

    let toc = text(&output, "OEBPS/toc.xhtml");
    assert_eq!(toc.matches("جزء ").count(), 30);
    assert!(toc.contains(r#"epub:type="page-list""#));
    assert_eq!(toc.matches("#page").count(), 604);
}

#[test]
fn scenario_b_single_footnote_bilingual() {
    let (pipeline, _) = common::pipeline(common::translated_corpus());
    let output = pipeline.build(&common::config("by_surah", true)).unwrap();
    assert_eq!(output.layout, LayoutKind::Bilingual);

    let notes = text(&output, "OEBPS/endnotes.xhtml");
    assert_eq!(notes.matches("epub:type=\"footnote\"").count(), 1);
    assert!(notes.contains(r#"id="fn-5""#));

    let chapter = text(&output, "OEBPS/chapter-2.xhtml");
    assert!(chapter.contains(r#"href="endnotes.xhtml#fn-5""#));

    let opf = text(&output, "OEBPS/package.opf");
    assert!(opf.contains(r#"<itemref idref="endnotes" linear="no"/>"#));
    assert!(opf.contains("<dc:language>en</dc:language>"));
    assert!(opf.contains(
        "<dc:rights>Quran text and translation sourced from Quran.com API</dc:rights>"
    ));
}

#[test]
fn scenario_c_missing_chapter_aborts_before_rendering() {
    let mut corpus = common::corpus();
    corpus.chapters.pop();
    let (pipeline, loads) = common::pipeline(corpus);

    match pipeline.build(&common::config("by_surah", false)) {
        Err(PipelineError::ValidationFailed(violations)) => {
            assert!(violations
                .iter()
                .any(|v| v.message.contains("expected 114, got 113")));
        }
        other => panic!("expected validation failure, got {:?}", other.map(|o| o.filename)),
    }
    assert_eq!(loads.get(), 1);
}

#[test]
fn scenario_d_interactive_without_translation_is_a_conflict() {
    let (pipeline, loads) = common::pipeline(common::corpus());

    match pipeline.build(&common::config("interactive_inline", false)) {
        Err(PipelineError::Config(conflicts)) => {
            assert_eq!(
                conflicts,
                vec![ConfigConflict::MissingTranslation {
                    layout: "interactive_inline".to_string()
                }]
            );
        }
        other => panic!("expected config conflict, got {:?}", other.map(|o| o.filename)),
    }
    assert_eq!(loads.get(), 0, "corpus source must not be consulted");
}

#[test]
fn invariant_idempotent_builds() {
    let (pipeline, _) = common::pipeline(common::translated_corpus());
    let config = common::config("interactive_inline", true);

    let first = pipeline.build(&config).unwrap();
    let second = pipeline.build(&config).unwrap();

    assert_eq!(first.package_id, second.package_id);
    assert_eq!(first.documents, second.documents);
    assert_eq!(first.manifest_hash, second.manifest_hash);
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn invariant_hrefs_resolve_for_every_layout() {
    let cases = [
        ("by_surah", false, false),
        ("inline", false, false),
        ("inline", false, true),
        ("bilingual_interleaved", true, false),
        ("interactive_inline", true, false),
    ];
    for (structure, translated, single_document) in cases {
        let corpus = if translated {
            common::translated_corpus()
        } else {
            common::corpus()
        };
        let (pipeline, _) = common::pipeline(corpus);
        let mut config = common::config(structure, translated);
        config.layout.single_document = single_document;

        let output = pipeline.build(&config).unwrap();
        assert_hrefs_resolve(&output);
    }
}

#[test]
fn invariant_single_document_inline() {
    let (pipeline, _) = common::pipeline(common::corpus());
    let mut config = common::config("inline", false);
    config.layout.single_document = true;
    let output = pipeline.build(&config).unwrap();

    assert!(content_paths(&output, "OEBPS/chapter-").is_empty());
    let chapters = text(&output, "OEBPS/chapters.xhtml");
    assert_eq!(chapters.matches("<section epub:type=\"chapter\"").count(), 114);
    assert!(text(&output, "OEBPS/toc.xhtml").contains(r#"href="chapters.xhtml#surah-114""#));
    assert!(output.filename.contains("_single_"));
}

#[test]
fn invariant_interactive_notes_have_no_links() {
    let (pipeline, _) = common::pipeline(common::translated_corpus());
    let output = pipeline.build(&common::config("interactive_inline", true)).unwrap();

    let notes = text(&output, "OEBPS/endnotes.xhtml");
    let body = &notes[notes.find("<body").unwrap()..];
    assert!(!body.contains("<a "));
    assert!(body.contains(r#"id="tn-2-255""#));
    assert!(body.contains("The Throne Verse."));
    assert!(text(&output, "OEBPS/chapter-2.xhtml").contains(r#"href="endnotes.xhtml#tn-2-255""#));
}

#[test]
fn invariant_mimetype_first_and_stored() {
    let (pipeline, _) = common::pipeline(common::corpus());
    let output = pipeline.build(&common::config("by_surah", false)).unwrap();
    let bytes = &output.bytes;

    assert_eq!(&bytes[0..4], b"PK\x03\x04");
    assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 0);
    assert_eq!(u16::from_le_bytes([bytes[28], bytes[29]]), 0);
    assert_eq!(&bytes[30..38], b"mimetype");
    assert_eq!(&bytes[38..58], b"application/epub+zip");

    let entries = common::unzip(bytes);
    assert_eq!(entries[0].0, "mimetype");
    assert!(entries.iter().any(|(name, _)| name == "META-INF/container.xml"));
    assert!(entries.iter().any(|(name, _)| name == "OEBPS/fonts/UthmanicHafs_V22.ttf"));
    assert!(entries.iter().any(|(name, _)| name == "OEBPS/fonts/ScheherazadeNew-Regular.ttf"));
}

#[test]
fn invariant_pairing_warning_does_not_block() {
    let (pipeline, _) = common::pipeline(common::corpus());
    let mut config = common::config("by_surah", false);
    config.font.arabic = "noto_sans_arabic".to_string();

    let output = pipeline.build(&config).unwrap();
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].font, "noto_sans_arabic");
}

#[test]
fn invariant_written_package_matches_bytes() {
    let (pipeline, _) = common::pipeline(common::corpus());
    let output = pipeline.build(&common::config("by_surah", false)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = output.write_to(&dir.path().join("nested")).unwrap();
    assert_eq!(path.file_name().unwrap(), "quran_hafs_qpc_kfgqpc_ayah_ar.epub");
    assert_eq!(std::fs::read(&path).unwrap(), output.bytes);
}
