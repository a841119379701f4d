//! Core: word extraction, language heuristic, morphology client, and the
//! search pipeline tying them together.

pub mod extractor;
pub mod language;
pub mod logging;
pub mod morphology;
pub mod pipeline;

pub use extractor::{extract_words, tokenize};
pub use language::{detect_language, Language};
pub use pipeline::{SearchOutcome, SearchPipeline, SearchRequest};
