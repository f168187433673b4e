/*!
 * Language utilities for ISO language code handling.
 *
 * Languages reach the pipeline either as ISO 639-1 / 639-2 codes ("hi",
 * "hin") or as English names ("Hindi"). These helpers normalize both.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn resolve(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == normalized)
                .map_or(normalized.as_str(), |(_, t)| *t);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

fn resolve_name(name: &str) -> Option<Language> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    Language::from_name(&wanted)
        .or_else(|| Language::from_name(&capitalize(&wanted)))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve an ISO code or an English language name
pub fn parse_language(code_or_name: &str) -> Result<Language> {
    resolve(code_or_name)
        .or_else(|| resolve_name(code_or_name))
        .ok_or_else(|| anyhow!("Unknown language: {}", code_or_name))
}

/// Check if two codes or names represent the same language.
/// Unknown values only match when their spelling matches case-insensitively.
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (parse_language(code1), parse_language(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => code1.trim().eq_ignore_ascii_case(code2.trim()),
    }
}

/// Get the English language name from a code or name
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(parse_language(code)?.to_name().to_string())
}
