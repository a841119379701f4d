//! Word Extractor
//!
//! Splits free text into words and keeps the unique ones containing a
//! substring, compared case-insensitively.
//!
//! Splitting is separator-based rather than word-class based, so any script
//! (Latin, Greek, Cyrillic, Arabic, ...) tokenizes the same way.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Separators (compiled once)
// ============================================================================

/// One or more whitespace, punctuation, or quote characters.
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\s,.!?;:()'"“”‘’«»]+"#).expect("Failed to compile separator regex")
});

/// Quote characters stripped from both ends of a fragment after splitting.
const EDGE_QUOTES: [char; 2] = ['\'', '"'];

// ============================================================================
// Tokenization
// ============================================================================

/// Cleaned, non-empty tokens of `text`, in order of appearance.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    SEPARATOR_RE
        .split(text)
        .map(|fragment| fragment.trim().trim_matches(&EDGE_QUOTES[..]))
        .filter(|word| !word.is_empty())
}

/// Lowercase `s` for matching.
///
/// `to_lowercase` already picks the final sigma form by context; folding `ς`
/// onto `σ` afterwards makes both letterforms match each other.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

// ============================================================================
// Extraction
// ============================================================================

/// Unique words of `text` containing `substring`, sorted by code point.
///
/// Returns an empty list when either input is empty. Words are deduplicated
/// on their literal spelling, so `Casa` and `casa` are both kept.
pub fn extract_words(text: &str, substring: &str) -> Vec<String> {
    if text.is_empty() || substring.is_empty() {
        return Vec::new();
    }

    let needle = fold_case(substring);

    let found: BTreeSet<&str> = tokenize(text)
        .filter(|word| fold_case(word).contains(&needle))
        .collect();

    log::debug!(
        "Extracted {} unique word(s) matching {:?}",
        found.len(),
        substring
    );

    found.into_iter().map(str::to_string).collect()
}

// ============================================================================
// Tests
// ============================================================================
