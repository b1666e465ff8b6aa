//! Supported-language allow-list shared by source and target validation.
//!
//! Codes are ISO-639-1 and compared exactly (case-sensitive); providers are
//! expected to report lower-case codes.

/// Languages the translator accepts, in picker order.
pub const SUPPORTED_LANGUAGES: [&str; 6] = ["en", "fr", "pt", "es", "tr", "ru"];

/// Returns `true` when `code` is a member of [`SUPPORTED_LANGUAGES`].
///
/// ```
/// use text_processor::language::is_supported;
///
/// assert!(is_supported("fr"));
/// assert!(!is_supported("de"));
/// assert!(!is_supported("FR"));
/// ```
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// English display name for a language code, used in prompts and the picker
/// tooltip.  Unknown codes return `None`.
pub fn display_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "en" => "English",
        "fr" => "French",
        "pt" => "Portuguese",
        "es" => "Spanish",
        "tr" => "Turkish",
        "ru" => "Russian",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_code_has_a_display_name() {
        for code in SUPPORTED_LANGUAGES {
            assert!(display_name(code).is_some(), "missing name for {code}");
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert!(!is_supported("xx"));
        assert!(!is_supported("de"));
        assert!(!is_supported(""));
        assert!(display_name("xx").is_none());
    }

    #[test]
    fn membership_is_exact() {
        assert!(is_supported("ru"));
        assert!(!is_supported(" ru"));
        assert!(!is_supported("EN"));
    }
}
