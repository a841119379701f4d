//! Property-based tests for Word Extraction
//!
//! Tests invariants:
//! - Empty text or empty substring yields no words
//! - Output is sorted by code point and free of duplicates
//! - Every returned word contains the folded substring
//! - No returned word is empty or contains a separator
//! - Extraction is deterministic and idempotent

use proptest::prelude::*;

use crate::core::extractor::{extract_words, fold_case, tokenize};

// ============================================================================
// Strategies
// ============================================================================

/// Characters from Latin, Spanish, and Greek letters plus separators.
fn text_char() -> impl Strategy<Value = char> {
    prop_oneof![
        4 => prop::char::range('a', 'z'),
        1 => prop::char::range('A', 'Z'),
        1 => prop::sample::select(vec!['á', 'é', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ü']),
        2 => prop::char::range('α', 'ω'),
        1 => prop::sample::select(vec!['Σ', 'Λ', 'ό', 'ά', 'έ']),
        3 => prop::sample::select(vec![' ', ',', '.', '!', '?', ';', ':', '(', ')', '\'', '"', '\n', '«', '»']),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(text_char(), 0..200).prop_map(|chars| chars.into_iter().collect())
}

fn arb_substring() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![prop::char::range('a', 'e'), prop::char::range('α', 'ε')],
        1..3,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

const SEPARATORS: &[char] = &[
    ',', '.', '!', '?', ';', ':', '(', ')', '\'', '"', '«', '»', '“', '”', '‘', '’',
];

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: Empty substring yields no words
    #[test]
    fn prop_empty_substring_yields_nothing(text in arb_text()) {
        prop_assert!(extract_words(&text, "").is_empty());
    }

    /// Property: Empty text yields no words
    #[test]
    fn prop_empty_text_yields_nothing(sub in arb_substring()) {
        prop_assert!(extract_words("", &sub).is_empty());
    }

    /// Property: Output is strictly increasing (sorted, unique)
    #[test]
    fn prop_output_sorted_and_unique(text in arb_text(), sub in arb_substring()) {
        let words = extract_words(&text, &sub);
        for pair in words.windows(2) {
            prop_assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
        }
    }

    /// Property: Every word contains the folded substring once folded
    #[test]
    fn prop_every_word_matches(text in arb_text(), sub in arb_substring()) {
        let needle = fold_case(&sub);
        for word in extract_words(&text, &sub) {
            prop_assert!(
                fold_case(&word).contains(&needle),
                "{:?} does not contain {:?}", word, needle
            );
        }
    }

    /// Property: No word is empty or carries whitespace or punctuation
    #[test]
    fn prop_words_are_clean_tokens(text in arb_text(), sub in arb_substring()) {
        for word in extract_words(&text, &sub) {
            prop_assert!(!word.is_empty());
            prop_assert!(!word.chars().any(char::is_whitespace));
            prop_assert!(!word.chars().any(|c| SEPARATORS.contains(&c)));
        }
    }

    /// Property: Every word is one of the tokens of the text
    #[test]
    fn prop_words_come_from_text(text in arb_text(), sub in arb_substring()) {
        let tokens: Vec<&str> = tokenize(&text).collect();
        for word in extract_words(&text, &sub) {
            prop_assert!(tokens.contains(&word.as_str()));
        }
    }

    /// Property: Case of the substring does not change the result
    #[test]
    fn prop_substring_case_insensitive(text in arb_text(), sub in arb_substring()) {
        prop_assert_eq!(
            extract_words(&text, &sub),
            extract_words(&text, &sub.to_uppercase())
        );
    }

    /// Property: Same input gives the same output
    #[test]
    fn prop_deterministic(text in arb_text(), sub in arb_substring()) {
        prop_assert_eq!(extract_words(&text, &sub), extract_words(&text, &sub));
    }

    /// Property: Extracting from the joined result returns the result
    #[test]
    fn prop_idempotent(text in arb_text(), sub in arb_substring()) {
        let words = extract_words(&text, &sub);
        prop_assert_eq!(extract_words(&words.join(" "), &sub), words);
    }
}
