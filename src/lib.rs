//! Wordsift - find every word containing a run of letters, with optional
//! morphological annotation from a language model.
//!
//! Core library providing the word extractor, the Greek/Spanish language
//! heuristic, the morphology client, and the terminal UI.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
