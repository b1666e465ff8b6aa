//! Chat prompts for the OpenAI-compatible capability adapter.
//!
//! Every builder returns a `(system_msg, user_msg)` tuple for a
//! `/v1/chat/completions` request.  The user message is always the raw
//! input text so the model never confuses instructions with content.

use crate::language;

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

const SUMMARIZE_INSTRUCTION: &str = "\
You are a summarization assistant.
Task: Summarize the text supplied by the user.

Rules:
1. Write the summary in the same language as the text.
2. Keep the key points; drop examples and repetition.
3. Use at most five sentences.
4. Reply with ONLY the summary, no preamble.";

const DETECT_INSTRUCTION: &str = "\
You are a language identification assistant.
Task: Identify the language of the text supplied by the user.

Rules:
1. Reply with ONLY a JSON array, no explanation.
2. Each element is an object {\"language\": <ISO-639-1 code>, \"confidence\": <0.0-1.0>}.
3. Order the elements from most to least likely; include at most three.
4. Reply with [] if the text has no identifiable language.

Example:
[{\"language\": \"fr\", \"confidence\": 0.92}, {\"language\": \"en\", \"confidence\": 0.05}]";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Prompt for a single summarization call.
pub fn summarize(text: &str) -> (String, String) {
    (SUMMARIZE_INSTRUCTION.to_string(), text.to_string())
}

/// Prompt for a single language-detection call.
pub fn detect(text: &str) -> (String, String) {
    (DETECT_INSTRUCTION.to_string(), text.to_string())
}

/// Prompt for translating `text` from `source` to `target`.
///
/// Codes outside the allow-list are passed through verbatim.
pub fn translate(text: &str, source: &str, target: &str) -> (String, String) {
    let source_name = language::display_name(source).unwrap_or(source);
    let target_name = language::display_name(target).unwrap_or(target);

    let system = format!(
        "You are a translation assistant.\n\
         Task: Translate the text supplied by the user from {source_name} ({source}) \
         to {target_name} ({target}).\n\n\
         Rules:\n\
         1. Preserve meaning, tone and formatting (line breaks, lists).\n\
         2. Keep proper nouns, code and URLs unchanged.\n\
         3. Reply with ONLY the translation, no notes."
    );
    (system, text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_is_the_raw_text() {
        let (_, user) = summarize("some text");
        assert_eq!(user, "some text");
        let (_, user) = detect("bonjour");
        assert_eq!(user, "bonjour");
    }

    #[test]
    fn detect_prompt_asks_for_json() {
        let (system, _) = detect("hola");
        assert!(system.contains("JSON array"));
    }

    #[test]
    fn translate_prompt_names_both_languages() {
        let (system, user) = translate("Hello", "en", "fr");
        assert!(system.contains("English (en)"));
        assert!(system.contains("French (fr)"));
        assert_eq!(user, "Hello");
    }

    #[test]
    fn translate_prompt_passes_unknown_codes_through() {
        let (system, _) = translate("Hallo", "de", "en");
        assert!(system.contains("de (de)"));
    }
}
