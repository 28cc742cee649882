//! XHTML fragments shared by every layout.

use crate::ingest::RUB_AL_HIZB;
use crate::markers::MarkerIndex;
use crate::model::{Chapter, Corpus, Verse};

use super::RenderOptions;

/// Escape text for use in XHTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Eastern Arabic-Indic numerals (٠١٢٣٤٥٦٧٨٩).
pub fn arabic_numerals(n: impl ToString) -> String {
    n.to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

pub fn verse_id(chapter: u16, verse: u16) -> String {
    format!("ayah-{}-{}", chapter, verse)
}

pub fn page_id(page: u16) -> String {
    format!("page{}", page)
}

pub fn chapter_id(chapter: u16) -> String {
    format!("surah-{}", chapter)
}

/// Complete XHTML document around a body fragment.
pub fn document(title: &str, lang: &str, dir: &str, body_class: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}" dir="{dir}">
<head>
  <meta charset="utf-8"/>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="styles/base.css"/>
</head>
<body class="{body_class}">
{body}
</body>
</html>
"#,
        lang = escape(lang),
        dir = dir,
        title = escape(title),
        body_class = body_class,
        body = body,
    )
}

/// Heading block for a chapter. `subtitle` adds the transliterated name.
pub fn chapter_heading(chapter: &Chapter, subtitle: bool) -> String {
    let mut out = format!(
        "<header class=\"surah-header\">\n  <h1 class=\"surah-name\">{}</h1>\n",
        escape(&chapter.name_arabic)
    );
    if subtitle {
        let mut name = format!("{}. {}", chapter.number, chapter.name_transliteration);
        if let Some(translated) = chapter.name_translation.as_deref().filter(|t| !t.is_empty()) {
            name.push_str(&format!(" ({})", translated));
        }
        out.push_str(&format!(
            "  <p class=\"surah-subtitle\" dir=\"ltr\">{}</p>\n",
            escape(&name)
        ));
    }
    out.push_str("</header>\n");
    out
}

/// Standalone invocation line, omitted for chapters 1 and 9.
pub fn invocation(corpus: &Corpus, chapter: &Chapter, options: &RenderOptions) -> String {
    if !options.show_invocation || !chapter.renders_invocation() {
        return String::new();
    }
    format!("<p class=\"bismillah\">{}</p>\n", escape(&corpus.invocation))
}

/// Page-break anchor when a new print page starts at this verse.
pub fn page_break(markers: &MarkerIndex, verse: &Verse) -> String {
    match markers.page_marker(verse.chapter, verse.number) {
        Some(page) => format!(
            "<span epub:type=\"pagebreak\" role=\"doc-pagebreak\" id=\"{}\" title=\"{}\"></span>",
            page_id(page),
            page
        ),
        None => String::new(),
    }
}

/// ۞ ornament at the start of a hizb quarter, unless the text already carries one.
pub fn hizb_ornament(markers: &MarkerIndex, verse: &Verse) -> &'static str {
    if verse.text.contains(RUB_AL_HIZB) {
        return "";
    }
    if verse.hizb_marker || markers.is_quarter_start(verse.chapter, verse.number) {
        "<span class=\"hizb\">۞</span> "
    } else {
        ""
    }
}

/// Verse-end marker carrying the verse number.
pub fn verse_marker(verse: &Verse, options: &RenderOptions) -> String {
    if !options.show_verse_numbers {
        return String::new();
    }
    format!(" <span class=\"ayah-number\">{}</span>", arabic_numerals(verse.number))
}

/// Verse text span with its anchor id.
pub fn verse_text(verse: &Verse) -> String {
    let class = if verse.sajdah { "ayah sajdah" } else { "ayah" };
    format!(
        "<span class=\"{}\" id=\"{}\">{}</span>",
        class,
        verse_id(verse.chapter, verse.number),
        escape(&verse.text)
    )
}
