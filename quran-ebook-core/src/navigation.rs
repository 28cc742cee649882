//! Navigation & Metadata - nav document, cover, package document, container
//!
//! Everything here links through the active `Layout`'s href functions, so
//! navigation always agrees with whatever anchor scheme rendered the content.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::BuildConfig;
use crate::layout::xhtml::{self, arabic_numerals, escape};
use crate::layout::{ContentDocument, Layout};
use crate::markers::MarkerIndex;
use crate::model::Corpus;
use crate::registry::{self, FontInfo, TextDirection, SYMBOL_FONT_KEY};

/// Project namespace for package identifiers.
pub const PACKAGE_NAMESPACE: Uuid = Uuid::from_u128(0xd4f76c9a_3b1e_4f2d_9a5c_8b7e6d1c2f3a);

pub const NAV_FILE: &str = "toc.xhtml";
pub const COVER_FILE: &str = "cover.xhtml";
pub const PACKAGE_FILE: &str = "package.opf";
pub const STYLESHEET_FILE: &str = "styles/base.css";

pub const JUZ_LABEL: &str = "جزء";

const PUBLISHER: &str = "quran-ebook";

/// Same output name, same identifier: e-readers treat a rebuild as an update.
pub fn package_id(output_name: &str) -> Uuid {
    Uuid::new_v5(&PACKAGE_NAMESPACE, output_name.as_bytes())
}

/// "القرآن الكريم — حفص — آية بآية — Sahih International"
pub fn descriptive_title(config: &BuildConfig) -> String {
    let riwayah = registry::riwayah(&config.quran.script);
    let mut parts = vec![
        config.book.title.clone(),
        registry::riwayah_arabic(riwayah).unwrap_or(riwayah).to_string(),
    ];
    // Layout only distinguishes editions that carry a translation
    if let Some(translation) = &config.translation {
        if let Some(label) = registry::layout_label_arabic(config.effective_layout_key()) {
            parts.push(label.to_string());
        }
        parts.push(translation.name.clone());
    }
    parts.join(" — ")
}

pub fn description(config: &BuildConfig) -> String {
    let riwayah = registry::riwayah(&config.quran.script);
    let layout_key = config.effective_layout_key();
    let mut parts = vec![
        format!("Riwayat {} 'an 'Asim", title_case(riwayah)),
        registry::layout_label_english(layout_key).unwrap_or(layout_key).to_string(),
        "Madinah Mushaf (1405 AH) page references (604 pages)".to_string(),
    ];
    if let Some(translation) = &config.translation {
        parts.push(format!(
            "{} translation ({})",
            translation.name,
            translation.language.to_uppercase()
        ));
    }
    parts.join(", ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Primary font, plus the symbol font when it is a different file.
pub fn embedded_fonts(primary: &'static FontInfo) -> Vec<&'static FontInfo> {
    let mut fonts = vec![primary];
    if let Some(symbol) = registry::font(SYMBOL_FONT_KEY) {
        if symbol.filename != primary.filename {
            fonts.push(symbol);
        }
    }
    fonts
}

/// EPUB 3 navigation document: chapters, juz landmarks and the page list.
pub fn nav_document(
    corpus: &Corpus,
    markers: &MarkerIndex,
    layout: &dyn Layout,
    language: &str,
    bilingual: bool,
) -> String {
    let mut body = String::from(
        "<nav epub:type=\"toc\" id=\"toc\" role=\"doc-toc\">\n  <h1>الفهرس</h1>\n  <ol>\n",
    );
    for chapter in &corpus.chapters {
        let mut label = format!(
            "{}. {}",
            arabic_numerals(chapter.number),
            escape(&chapter.name_arabic)
        );
        if bilingual {
            label.push_str(&format!(
                " <span class=\"toc-transliteration\" dir=\"ltr\">{}</span>",
                escape(&chapter.name_transliteration)
            ));
        }
        body.push_str(&format!(
            "    <li><a href=\"{}\">{}</a></li>\n",
            layout.chapter_href(chapter.number),
            label
        ));
    }
    body.push_str("  </ol>\n</nav>\n");

    let juz = markers.juz_boundaries();
    if !juz.is_empty() {
        body.push_str("<nav epub:type=\"landmarks\" id=\"juz\" class=\"juz-list\">\n  <h2>الأجزاء</h2>\n  <ol>\n");
        for boundary in juz {
            body.push_str(&format!(
                "    <li><a epub:type=\"bodymatter\" href=\"{}\">{} {}</a></li>\n",
                layout.verse_href(boundary.chapter, boundary.verse),
                JUZ_LABEL,
                arabic_numerals(boundary.juz)
            ));
        }
        body.push_str("  </ol>\n</nav>\n");
    }

    if markers.has_pages() {
        body.push_str("<nav epub:type=\"page-list\" id=\"page-list\" hidden=\"hidden\">\n  <ol>\n");
        for marker in markers.page_markers() {
            body.push_str(&format!(
                "    <li><a href=\"{}\">{}</a></li>\n",
                layout.page_href(marker.chapter, marker.page),
                marker.page
            ));
        }
        body.push_str("  </ol>\n</nav>\n");
    }

    xhtml::document("الفهرس", language, TextDirection::Rtl.as_str(), "toc", &body)
}

pub fn cover_document(config: &BuildConfig, generator_version: &str) -> String {
    let mut body = format!(
        "<section epub:type=\"cover\" class=\"cover\">\n  <h1 class=\"cover-title\">{}</h1>\n",
        escape(&config.book.title)
    );
    if let Some(subtitle) = registry::script_label_arabic(&config.quran.script) {
        body.push_str(&format!("  <p class=\"cover-subtitle\">{}</p>\n", escape(subtitle)));
    }
    if let Some(translation) = &config.translation {
        if let Some(label) = registry::layout_label_arabic(config.effective_layout_key()) {
            body.push_str(&format!("  <p class=\"cover-layout\">{}</p>\n", escape(label)));
        }
        body.push_str(&format!(
            "  <p class=\"cover-translation\" dir=\"auto\">{}</p>\n",
            escape(&translation.byline())
        ));
    }
    body.push_str(&format!(
        "  <p class=\"cover-version\" dir=\"ltr\">{} {}</p>\n</section>",
        PUBLISHER,
        escape(generator_version)
    ));
    xhtml::document(
        &config.book.title,
        &config.book.language,
        TextDirection::Rtl.as_str(),
        "cover",
        &body,
    )
}

/// Values for the package document's metadata block.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub identifier: Uuid,
    pub title: String,
    pub language: String,
    pub translation_language: Option<String>,
    pub description: String,
    pub modified: DateTime<Utc>,
    pub generator: String,
    pub rights: String,
}

/// Credited when the corpus dump names no source of its own.
pub const DEFAULT_TEXT_SOURCE: &str = "Quran.com API";

pub fn rights(source: Option<&str>, translated: bool) -> String {
    let content = if translated { "Quran text and translation" } else { "Quran text" };
    format!("{} sourced from {}", content, source.unwrap_or(DEFAULT_TEXT_SOURCE))
}

impl PackageMetadata {
    pub fn from_config(config: &BuildConfig, modified: DateTime<Utc>, generator: &str) -> Self {
        Self {
            identifier: package_id(&config.output_filename()),
            title: descriptive_title(config),
            language: config.book.language.clone(),
            translation_language: config.translation.as_ref().map(|t| t.language.clone()),
            description: description(config),
            modified,
            generator: generator.to_string(),
            rights: rights(None, config.translation.is_some()),
        }
    }

    /// Credit the corpus dump's own `source` entry.
    pub fn with_source(mut self, source: Option<&str>) -> Self {
        self.rights = rights(source, self.translation_language.is_some());
        self
    }
}

/// `package.opf`: metadata, manifest and a right-to-left spine.
pub fn package_document(
    metadata: &PackageMetadata,
    documents: &[ContentDocument],
    fonts: &[&FontInfo],
) -> String {
    let mut manifest = vec![
        format!(
            "<item id=\"toc\" href=\"{}\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>",
            NAV_FILE
        ),
        format!(
            "<item id=\"cover\" href=\"{}\" media-type=\"application/xhtml+xml\"/>",
            COVER_FILE
        ),
    ];
    let mut spine = vec![
        "<itemref idref=\"cover\"/>".to_string(),
        "<itemref idref=\"toc\"/>".to_string(),
    ];

    for document in documents {
        manifest.push(format!(
            "<item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>",
            document.id, document.filename
        ));
        if document.linear {
            spine.push(format!("<itemref idref=\"{}\"/>", document.id));
        } else {
            spine.push(format!("<itemref idref=\"{}\" linear=\"no\"/>", document.id));
        }
    }

    manifest.push(format!(
        "<item id=\"css\" href=\"{}\" media-type=\"text/css\"/>",
        STYLESHEET_FILE
    ));
    for (i, font) in fonts.iter().enumerate() {
        let id = if i == 0 {
            "font-arabic".to_string()
        } else {
            format!("font-symbol-{}", i)
        };
        manifest.push(format!(
            "<item id=\"{}\" href=\"fonts/{}\" media-type=\"font/ttf\"/>",
            id, font.filename
        ));
    }

    let extra_language = metadata
        .translation_language
        .as_deref()
        .map(|lang| format!("\n    <dc:language>{}</dc:language>", escape(lang)))
        .unwrap_or_default();
    let indent = |items: Vec<String>| -> String {
        items.iter().map(|item| format!("    {}\n", item)).collect()
    };

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0"
         unique-identifier="bookid" xml:lang="{language}" dir="rtl">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="bookid">urn:uuid:{identifier}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:language>{language}</dc:language>{extra_language}
    <dc:description>{description}</dc:description>
    <dc:publisher>{publisher}</dc:publisher>
    <dc:rights>{rights}</dc:rights>
    <dc:subject>Quran</dc:subject>
    <meta property="dcterms:modified">{modified}</meta>
    <meta name="generator" content="{publisher} {generator}"/>
    <meta name="primary-writing-mode" content="horizontal-rl"/>
  </metadata>
  <manifest>
{manifest}  </manifest>
  <spine page-progression-direction="rtl">
{spine}  </spine>
</package>
"#,
        language = escape(&metadata.language),
        identifier = metadata.identifier,
        title = escape(&metadata.title),
        extra_language = extra_language,
        description = escape(&metadata.description),
        publisher = PUBLISHER,
        rights = escape(&metadata.rights),
        modified = metadata.modified.format("%Y-%m-%dT%H:%M:%SZ"),
        generator = escape(&metadata.generator),
        manifest = indent(manifest),
        spine = indent(spine),
    )
}

pub fn container_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="utf-8"?>
<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container" version="1.0">
  <rootfiles>
    <rootfile full-path="OEBPS/package.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#
}

/// Tells Apple Books to honour the embedded fonts.
pub fn ibooks_display_options() -> &'static str {
    r#"<?xml version="1.0" encoding="utf-8"?>
<display_options>
  <platform name="*">
    <option name="specified-fonts">true</option>
  </platform>
</display_options>
"#
}

/// Base stylesheet with `@font-face` rules for the embedded fonts.
pub fn stylesheet(primary: &FontInfo, symbol: &FontInfo) -> String {
    format!(
        r#"@font-face {{
  font-family: "{family}";
  src: url("../fonts/{filename}") format("truetype");
}}

@font-face {{
  font-family: "{symbol_family}";
  src: url("../fonts/{symbol_filename}") format("truetype");
}}

html, body {{
  direction: rtl;
  margin: 0;
  padding: 0;
}}

body {{
  font-family: "{family}", serif;
  line-height: 2;
  text-align: justify;
}}

.surah-header {{
  text-align: center;
  margin: 1em 0;
  page-break-after: avoid;
}}

.surah-name {{
  font-size: 1.6em;
  font-weight: normal;
}}

.surah-subtitle, .toc-transliteration {{
  font-family: serif;
  font-size: 0.8em;
}}

.bismillah {{
  text-align: center;
  font-size: 1.2em;
  margin: 0.5em 0 1em 0;
}}

.ayah-line {{
  margin: 0 0 0.6em 0;
}}

.ayah-number {{
  font-family: "{symbol_family}", serif;
  text-decoration: none;
  color: inherit;
}}

.hizb {{
  font-family: "{symbol_family}", serif;
}}

.sajdah {{
  text-decoration: overline;
}}

.ayah-block {{
  margin: 0 0 1em 0;
}}

.ayah-translation {{
  font-family: serif;
  text-align: start;
  line-height: 1.5;
}}

.ayah-ref {{
  font-weight: bold;
}}

a.noteref {{
  text-decoration: none;
  vertical-align: super;
  font-size: 0.7em;
}}

.endnotes {{
  font-family: serif;
  line-height: 1.5;
}}

.cover {{
  text-align: center;
  margin-top: 30%;
}}

.cover-title {{
  font-size: 2.4em;
  font-weight: normal;
}}

.cover-version {{
  font-family: serif;
  font-size: 0.7em;
}}
"#,
        family = primary.family,
        filename = primary.filename,
        symbol_family = symbol.family,
        symbol_filename = symbol.filename,
    )
}
