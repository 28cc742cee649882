//! Static Registries - fonts, script/font pairings, labels, abbreviations
//!
//! Read-only lookup tables. Pairing a script with a font that doesn't
//! support its codepoints renders stray sukun dots and broken ligatures,
//! so every script lists the fonts known to render it correctly.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontInfo {
    pub key: &'static str,
    /// CSS font-family name.
    pub family: &'static str,
    pub filename: &'static str,
    pub source_url: &'static str,
    pub license: &'static str,
}

pub static FONTS: &[FontInfo] = &[
    FontInfo {
        key: "amiri_quran",
        family: "Amiri Quran",
        filename: "AmiriQuran.ttf",
        source_url: "https://github.com/aliftype/amiri/releases/download/1.003/Amiri-1.003.zip",
        license: "SIL OFL 1.1",
    },
    FontInfo {
        key: "scheherazade_new",
        family: "Scheherazade New",
        filename: "ScheherazadeNew-Regular.ttf",
        source_url: "https://github.com/silnrsi/font-scheherazade/releases/download/v4.400/ScheherazadeNew-4.400.zip",
        license: "SIL OFL 1.1",
    },
    FontInfo {
        key: "kfgqpc_uthmanic_hafs",
        family: "KFGQPC HAFS Uthmanic Script",
        filename: "UthmanicHafs_V22.ttf",
        source_url: "https://static-cdn.tarteel.ai/qul/fonts/UthmanicHafs_V22.ttf",
        license: "KFGQPC",
    },
    FontInfo {
        key: "me_quran",
        family: "me_quran",
        filename: "me_quran_volt_newmet.ttf",
        source_url: "https://static-cdn.tarteel.ai/qul/fonts/me_quran_volt_newmet.ttf",
        license: "Free",
    },
    FontInfo {
        key: "noto_sans_arabic",
        family: "Noto Sans Arabic",
        filename: "NotoSansArabic-Regular.ttf",
        source_url: "https://raw.githubusercontent.com/notofonts/notofonts.github.io/main/fonts/NotoSansArabic/unhinted/ttf/NotoSansArabic-Regular.ttf",
        license: "SIL OFL 1.1",
    },
];

/// Renders the ۞ ornament and plain Arabic-Indic digits.
pub const SYMBOL_FONT_KEY: &str = "scheherazade_new";

/// Scripts the corpus source can supply, with their validated fonts.
/// The first font is the recommended default; an empty list means unvalidated.
pub static SCRIPT_FONT_PAIRS: &[(&str, &[&str])] = &[
    ("qpc_uthmani_hafs", &["kfgqpc_uthmanic_hafs", "amiri_quran"]),
    ("text_qpc_hafs", &["kfgqpc_uthmanic_hafs", "amiri_quran"]),
    ("text_uthmani", &["amiri_quran", "scheherazade_new", "me_quran"]),
    ("text_uthmani_simple", &["amiri_quran", "scheherazade_new"]),
    ("text_uthmani_tajweed", &[]),
    ("text_imlaei", &["amiri_quran", "scheherazade_new"]),
    ("text_imlaei_simple", &["amiri_quran", "scheherazade_new"]),
    ("text_indopak", &[]),
    ("text_indopak_nastaleeq", &[]),
    ("text_qpc_nastaleeq", &[]),
    ("text_qpc_nastaleeq_hafs", &[]),
];

/// (English, Arabic) display labels per script.
static SCRIPT_LABELS: &[(&str, &str, &str)] = &[
    ("qpc_uthmani_hafs", "QPC Uthmani Hafs", "برواية حفص عن عاصم"),
    ("text_uthmani", "Uthmani", "الرسم العثماني"),
    ("text_uthmani_simple", "Uthmani (Simplified)", "الرسم العثماني المبسّط"),
    ("text_imlaei", "Imla'i", "الرسم الإملائي"),
    ("text_imlaei_simple", "Imla'i (Simplified)", "الرسم الإملائي المبسّط"),
    ("text_indopak", "IndoPak", "الرسم الهندي"),
];

static RIWAYAH_ARABIC: &[(&str, &str)] = &[
    ("hafs", "حفص"),
    ("warsh", "ورش"),
    ("qalun", "قالون"),
    ("shubah", "شعبة"),
];

/// (key, English, Arabic) labels per layout.
static LAYOUT_LABELS: &[(&str, &str, &str)] = &[
    ("by_surah", "Ayah by ayah", "آية بآية"),
    ("inline", "Continuous text", "نص مستمر"),
    ("bilingual_interleaved", "Bilingual ayah by ayah", "آية بآية"),
    ("interactive_inline", "Interactive continuous text", "نص مستمر"),
];

static FONT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("amiri_quran", "amiri"),
    ("scheherazade_new", "schz"),
    ("kfgqpc_uthmanic_hafs", "kfgqpc"),
    ("me_quran", "meq"),
    ("noto_sans_arabic", "noto"),
];

static SCRIPT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("qpc_uthmani_hafs", "qpc"),
    ("text_qpc_hafs", "qpc"),
    ("text_uthmani", "uthmani"),
    ("text_uthmani_simple", "uthmani-simple"),
    ("text_uthmani_tajweed", "tajweed"),
    ("text_imlaei", "imlaei"),
    ("text_imlaei_simple", "imlaei-simple"),
    ("text_indopak", "indopak"),
];

static LAYOUT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("by_surah", "ayah"),
    ("inline", "inline"),
    ("bilingual_interleaved", "bilin"),
    ("interactive_inline", "interactive"),
];

static NATIVE_LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("es", "Español"),
    ("id", "Bahasa Indonesia"),
    ("ms", "Bahasa Melayu"),
    ("tr", "Türkçe"),
    ("ur", "اردو"),
    ("fa", "فارسی"),
    ("bn", "বাংলা"),
    ("ru", "Русский"),
    ("zh", "中文"),
];

static RTL_LANGUAGES: &[&str] = &["ar", "fa", "ur", "he", "ps", "dv", "ku", "ug", "sd", "yi"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

fn lookup<'a>(table: &'a [(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn font(key: &str) -> Option<&'static FontInfo> {
    FONTS.iter().find(|f| f.key == key)
}

pub fn is_known_script(script: &str) -> bool {
    SCRIPT_FONT_PAIRS.iter().any(|(s, _)| *s == script)
}

/// Validated fonts for a script, `None` for an unregistered script.
pub fn fonts_for_script(script: &str) -> Option<&'static [&'static str]> {
    SCRIPT_FONT_PAIRS.iter().find(|(s, _)| *s == script).map(|(_, f)| *f)
}

pub fn default_font(script: &str) -> Option<&'static str> {
    fonts_for_script(script).and_then(|fonts| fonts.first().copied())
}

pub fn script_label_english(script: &str) -> Option<&'static str> {
    SCRIPT_LABELS.iter().find(|(s, _, _)| *s == script).map(|(_, en, _)| *en)
}

/// One registered script with its labels and validated fonts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub default_font: Option<&'static str>,
    pub fonts: &'static [&'static str],
}

/// Every script the corpus source can supply. Unlabelled scripts use their key.
pub fn scripts() -> Vec<ScriptInfo> {
    SCRIPT_FONT_PAIRS
        .iter()
        .map(|&(key, fonts)| ScriptInfo {
            key,
            label: script_label_english(key).unwrap_or(key),
            default_font: default_font(key),
            fonts,
        })
        .collect()
}

pub fn script_label_arabic(script: &str) -> Option<&'static str> {
    SCRIPT_LABELS.iter().find(|(s, _, _)| *s == script).map(|(_, _, ar)| *ar)
}

/// Every registered script is a Hafs text today.
pub fn riwayah(script: &str) -> &'static str {
    if script.contains("warsh") {
        "warsh"
    } else if script.contains("qalun") {
        "qalun"
    } else {
        "hafs"
    }
}

pub fn riwayah_arabic(riwayah: &str) -> Option<&'static str> {
    lookup(RIWAYAH_ARABIC, riwayah)
}

pub fn layout_label_english(layout_key: &str) -> Option<&'static str> {
    LAYOUT_LABELS.iter().find(|(k, _, _)| *k == layout_key).map(|(_, en, _)| *en)
}

pub fn layout_label_arabic(layout_key: &str) -> Option<&'static str> {
    LAYOUT_LABELS.iter().find(|(k, _, _)| *k == layout_key).map(|(_, _, ar)| *ar)
}

/// Short code used in output filenames, or the key itself.
pub fn abbreviate_font(key: &str) -> &str {
    lookup(FONT_ABBREVIATIONS, key).unwrap_or(key)
}

pub fn abbreviate_script(key: &str) -> &str {
    lookup(SCRIPT_ABBREVIATIONS, key).unwrap_or(key)
}

pub fn abbreviate_layout(key: &str) -> &str {
    lookup(LAYOUT_ABBREVIATIONS, key).unwrap_or(key)
}

pub fn native_language_name(code: &str) -> Option<&'static str> {
    lookup(NATIVE_LANGUAGE_NAMES, code)
}

/// Defaults to left-to-right for unknown languages.
pub fn language_direction(code: &str) -> TextDirection {
    if RTL_LANGUAGES.contains(&code) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}
