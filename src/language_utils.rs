//! Language utilities for transcription requests
//!
//! Whisper-style APIs expect ISO 639-1 (2-letter) codes. Users may also type
//! ISO 639-2 codes, bibliographic variants, or "auto".

use anyhow::{Result, anyhow};
use isolang::Language;

/// Map ISO 639-2/B codes to their ISO 639-2/T equivalents
fn bibliographic_to_terminological(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Look up a language from a 2- or 3-letter code
fn lookup(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => {
            let part2t = bibliographic_to_terminological(&normalized).unwrap_or(normalized.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Whether the code asks the service to detect the language itself
pub fn is_auto_detect(code: &str) -> bool {
    let normalized = code.trim().to_lowercase();
    normalized.is_empty() || normalized == "auto"
}

/// Resolve a user-supplied code to what the transcription API expects
///
/// Returns `None` for auto-detection, otherwise the ISO 639-1 code (or the
/// ISO 639-3 code for languages without a 2-letter code).
pub fn resolve_transcription_language(code: &str) -> Result<Option<String>> {
    if is_auto_detect(code) {
        return Ok(None);
    }

    let lang = lookup(code).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    let resolved = lang
        .to_639_1()
        .map(|c| c.to_string())
        .unwrap_or_else(|| lang.to_639_3().to_string());

    Ok(Some(resolved))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    if is_auto_detect(code) {
        return Ok("Auto-detect".to_string());
    }

    let lang = lookup(code).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(lang.to_name().to_string())
}
