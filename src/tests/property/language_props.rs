//! Property-based tests for Language Detection
//!
//! Tests invariants:
//! - Any text containing a Greek-block character is Greek
//! - Text without Greek-block characters is Spanish
//! - Detection is independent of where the Greek character sits

use proptest::prelude::*;

use crate::core::language::{detect_language, Language};

fn is_greek_block(c: char) -> bool {
    ('\u{0370}'..='\u{03FF}').contains(&c)
}

fn non_greek_text() -> impl Strategy<Value = String> {
    any::<String>().prop_map(|s| s.chars().filter(|c| !is_greek_block(*c)).collect())
}

fn greek_char() -> impl Strategy<Value = char> {
    prop::char::range('\u{0370}', '\u{03FF}')
}

proptest! {
    /// Property: Text with no Greek-block character is Spanish
    #[test]
    fn prop_non_greek_is_spanish(text in non_greek_text()) {
        prop_assert_eq!(detect_language(&text), Language::Spanish);
    }

    /// Property: One Greek-block character anywhere makes the text Greek
    #[test]
    fn prop_single_greek_char_decides(
        prefix in non_greek_text(),
        suffix in non_greek_text(),
        greek in greek_char(),
    ) {
        let text = format!("{prefix}{greek}{suffix}");
        prop_assert_eq!(detect_language(&text), Language::Greek);
    }

    /// Property: Detection agrees with a direct scan of the text
    #[test]
    fn prop_greek_detection_matches_scan(text in any::<String>()) {
        let expected = if text.chars().any(is_greek_block) {
            Language::Greek
        } else {
            Language::Spanish
        };
        prop_assert_eq!(detect_language(&text), expected);
    }
}
