//! Language names, codes and the English/Chinese main-language heuristic.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placeholder meaning "infer from the text"
pub const AUTO: &str = "auto";

pub const ENGLISH: &str = "en-US";
pub const CHINESE: &str = "zh-CN";

/// Human-readable language names accepted in place of codes
static LANGUAGE_MAP: &[(&str, &str)] = &[
    ("arabic", "ar"),
    ("bulgarian", "bg"),
    ("catalan", "ca"),
    ("chinese", "zh-CN"),
    ("chinese simplified", "zh-CHS"),
    ("chinese traditional", "zh-CHT"),
    ("czech", "cs"),
    ("danish", "da"),
    ("dutch", "nl"),
    ("english", "en"),
    ("estonian", "et"),
    ("finnish", "fi"),
    ("french", "fr"),
    ("german", "de"),
    ("greek", "el"),
    ("haitian creole", "ht"),
    ("hebrew", "he"),
    ("hindi", "hi"),
    ("hmong daw", "mww"),
    ("hungarian", "hu"),
    ("indonesian", "id"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("klingon", "tlh"),
    ("klingon (piqad)", "tlh-Qaak"),
    ("korean", "ko"),
    ("latvian", "lv"),
    ("lithuanian", "lt"),
    ("malay", "ms"),
    ("maltese", "mt"),
    ("norwegian", "no"),
    ("persian", "fa"),
    ("polish", "pl"),
    ("portuguese", "pt"),
    ("romanian", "ro"),
    ("russian", "ru"),
    ("slovak", "sk"),
    ("slovenian", "sl"),
    ("spanish", "es"),
    ("swedish", "sv"),
    ("thai", "th"),
    ("turkish", "tr"),
    ("ukrainian", "uk"),
    ("urdu", "ur"),
    ("vietnamese", "vi"),
    ("welsh", "cy"),
];

/// Case-insensitive name lookup, e.g. `"Chinese"` -> `"zh-CN"`
pub fn lookup(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    LANGUAGE_MAP
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Map a language name to its code; unknown names are returned unchanged
pub fn normalize(lang: &str) -> String {
    lookup(lang).map(str::to_string).unwrap_or_else(|| lang.to_string())
}

fn is_auto(lang: Option<&str>) -> bool {
    match lang {
        None => true,
        Some(l) => {
            let l = l.trim();
            l.is_empty() || l.eq_ignore_ascii_case(AUTO)
        }
    }
}

/// Main-language classification of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextClass {
    English,
    Chinese,
    /// Neither language reaches the threshold
    Mixed,
    /// Nothing but whitespace and punctuation
    Unknown,
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || ('\u{2000}'..='\u{206f}').contains(&c) // general punctuation
        || ('\u{3000}'..='\u{303f}').contains(&c) // CJK symbols and punctuation
        || ('\u{ff01}'..='\u{ff0f}').contains(&c)
        || ('\u{ff1a}'..='\u{ff20}').contains(&c)
        || ('\u{ff3b}'..='\u{ff40}').contains(&c)
        || ('\u{ff5b}'..='\u{ff65}').contains(&c)
}

/// Classify `text` by the share of Chinese ideographs and ASCII letters among
/// its non-whitespace, non-punctuation characters. English wins ties.
pub fn detect(text: &str, threshold: f64) -> TextClass {
    let mut english = 0usize;
    let mut chinese = 0usize;
    let mut total = 0usize;

    for c in text.chars() {
        if c.is_whitespace() || is_punctuation(c) {
            continue;
        }
        total += 1;
        if is_cjk_ideograph(c) {
            chinese += 1;
        } else if c.is_ascii_alphabetic() {
            english += 1;
        }
    }

    if total == 0 {
        return TextClass::Unknown;
    }

    let english_ratio = english as f64 / total as f64;
    let chinese_ratio = chinese as f64 / total as f64;

    if english_ratio >= threshold {
        TextClass::English
    } else if chinese_ratio >= threshold {
        TextClass::Chinese
    } else {
        TextClass::Mixed
    }
}

/// Counterpart used when only one side of the pair was given
fn complement(code: &str) -> &'static str {
    if code.to_lowercase().starts_with("zh") {
        ENGLISH
    } else {
        CHINESE
    }
}

/// Resolve the source/target pair for a request.
///
/// When both sides are unset or `auto`, the text decides: English text goes
/// to Chinese, everything else (Chinese, mixed, unknown) goes to English.
/// Otherwise given names are mapped through the language table and a single
/// missing side becomes the counterpart of the other one.
pub fn resolve(
    source: Option<&str>,
    target: Option<&str>,
    text: &str,
    threshold: f64,
) -> (String, String) {
    match (is_auto(source), is_auto(target)) {
        (true, true) => {
            let class = detect(text, threshold);
            debug!("Detected main language {:?} (threshold {})", class, threshold);
            match class {
                TextClass::English => (ENGLISH.to_string(), CHINESE.to_string()),
                _ => (CHINESE.to_string(), ENGLISH.to_string()),
            }
        }
        (false, true) => {
            let source = normalize(source.unwrap_or_default().trim());
            let target = complement(&source).to_string();
            (source, target)
        }
        (true, false) => {
            let target = normalize(target.unwrap_or_default().trim());
            let source = complement(&target).to_string();
            (source, target)
        }
        (false, false) => (
            normalize(source.unwrap_or_default().trim()),
            normalize(target.unwrap_or_default().trim()),
        ),
    }
}
