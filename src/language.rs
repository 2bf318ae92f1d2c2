//! Language codes and supported-language catalogs
//!
//! Providers disagree on how they spell language codes: Azure reports
//! `zh-Hans`, DeepL reports `EN-GB`, Google reports `zh-CN`. This module owns
//! the canonical form used everywhere inside the engine, plus the
//! [`SupportedLanguage`] catalog entry each provider reports.
//!
//! Normalization is applied whenever a provider returns its *own* catalog,
//! never to codes supplied by a caller: callers are expected to already speak
//! the canonical dialect.

use serde::{Deserialize, Serialize};

/// A normalized language identifier, e.g. `"en"` or `"zh-cn"`
pub type LanguageCode = String;

/// Sentinel language code meaning "auto-detect the source language"
pub const UNDEFINED_LANG: &str = "xx";

/// Legacy or provider-specific aliases mapped to their canonical codes
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("lzh", "zh"),
    ("zh-hans", "zh-cn"),
    ("zh-hant", "zh-tw"),
];

/// Text direction of a language's script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// One language as reported by a provider's catalog endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedLanguage {
    /// Canonical language code (already normalized)
    pub code: LanguageCode,
    /// Display name in the catalog's reporting language, e.g. "French"
    pub name: String,
    /// Display name in the language itself, e.g. "Français"
    pub native_name: String,
    pub direction: TextDirection,
}

impl SupportedLanguage {
    pub fn new(code: &str, name: &str, native_name: &str, direction: TextDirection) -> Self {
        SupportedLanguage {
            code: code.to_string(),
            name: name.to_string(),
            native_name: native_name.to_string(),
            direction,
        }
    }
}

/// Normalize a provider-reported language code to its canonical form
///
/// Lowercases the code and rewrites known legacy aliases:
///
/// - `lzh` → `zh`
/// - `zh-Hans` → `zh-cn`
/// - `zh-Hant` → `zh-tw`
///
/// # Example
///
/// ```
/// use mt_hub::language::normalize_language_code;
///
/// assert_eq!(normalize_language_code("EN-GB"), "en-gb");
/// assert_eq!(normalize_language_code("zh-Hant"), "zh-tw");
/// ```
pub fn normalize_language_code(code: &str) -> LanguageCode {
    let lowered = code.to_lowercase();
    for (alias, canonical) in LANGUAGE_ALIASES {
        if lowered == *alias {
            return canonical.to_string();
        }
    }
    lowered
}

/// Base language of a code: the substring before the first `-`
///
/// Used by the lenient support check, where a provider that only knows `en`
/// can still serve a request for `en-GB`.
pub fn base_language(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Languages written right-to-left, by base language code
const RTL_LANGUAGES: &[&str] = &[
    "ar", "arc", "dv", "fa", "ha", "he", "khw", "ks", "ku", "ps", "ur", "yi",
];

/// Text direction for a language code, judged by its base language
pub fn direction_of(code: &str) -> TextDirection {
    if RTL_LANGUAGES.contains(&base_language(code)) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Validate that a language code is in an acceptable shape
///
/// Accepts ASCII alphanumerics, `-` and `_`; rejects empty codes. This guards
/// provider URLs against junk input, it is not a full BCP 47 validator.
pub fn validate_language_code(code: &str) -> crate::error::MtResult<()> {
    if code.is_empty() {
        return Err(crate::error::MtError::Config(
            "language code is empty".to_string(),
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(crate::error::MtError::Config(format!(
            "invalid characters in language code: {}",
            code
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Normalization Tests ==========

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_language_code("EN"), "en");
        assert_eq!(normalize_language_code("EN-GB"), "en-gb");
        assert_eq!(normalize_language_code("zh-CN"), "zh-cn");
    }

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_language_code("lzh"), "zh");
        assert_eq!(normalize_language_code("zh-Hans"), "zh-cn");
        assert_eq!(normalize_language_code("zh-Hant"), "zh-tw");
    }

    #[test]
    fn test_normalize_passes_canonical_through() {
        assert_eq!(normalize_language_code("en"), "en");
        assert_eq!(normalize_language_code("zh-cn"), "zh-cn");
        assert_eq!(normalize_language_code("nl"), "nl");
    }

    // ========== Base Language Tests ==========

    #[test]
    fn test_base_language_strips_region() {
        assert_eq!(base_language("en-gb"), "en");
        assert_eq!(base_language("pt-br"), "pt");
    }

    #[test]
    fn test_base_language_plain_code_unchanged() {
        assert_eq!(base_language("fr"), "fr");
    }

    // ========== Direction Tests ==========

    #[test]
    fn test_direction_rtl() {
        assert_eq!(direction_of("ar"), TextDirection::Rtl);
        assert_eq!(direction_of("he"), TextDirection::Rtl);
        assert_eq!(direction_of("fa-af"), TextDirection::Rtl);
    }

    #[test]
    fn test_direction_ltr_default() {
        assert_eq!(direction_of("en"), TextDirection::Ltr);
        assert_eq!(direction_of("zh-cn"), TextDirection::Ltr);
    }

    // ========== Validation Tests ==========

    #[test]
    fn test_validate_accepts_common_codes() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("en-GB").is_ok());
        assert!(validate_language_code("zh_Hans").is_ok());
    }

    #[test]
    fn test_validate_rejects_junk() {
        assert!(validate_language_code("").is_err());
        assert!(validate_language_code("en@US").is_err());
        assert!(validate_language_code("fr#bad").is_err());
    }

    // ========== Serde Tests ==========

    #[test]
    fn test_supported_language_round_trips_as_json() {
        let lang = SupportedLanguage::new("ar", "Arabic", "العربية", TextDirection::Rtl);
        let json = serde_json::to_string(&lang).unwrap();
        let back: SupportedLanguage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lang);
        assert!(json.contains("\"rtl\""));
    }
}
