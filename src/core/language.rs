//! Language heuristic used to parameterize the morphology prompt.
//!
//! This is a script presence test, not language identification: any
//! character from the Greek and Coptic block labels the text Greek,
//! everything else falls back to Spanish.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Greek and Coptic Unicode block.
const GREEK_BLOCK: std::ops::RangeInclusive<char> = '\u{0370}'..='\u{03FF}';

/// Language label sent to the morphology model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Greek,
    Spanish,
}

impl Language {
    pub fn label(self) -> &'static str {
        match self {
            Language::Greek => "greek",
            Language::Spanish => "spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label `text` as Greek if it contains any Greek-block character.
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(|c| GREEK_BLOCK.contains(&c)) {
        Language::Greek
    } else {
        Language::Spanish
    }
}
