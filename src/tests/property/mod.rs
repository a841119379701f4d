//! Property-based tests for Wordsift
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Test Modules
//!
//! - `extractor_props`: Tests for word extraction
//!   - Empty inputs yield no words
//!   - Output is sorted and unique
//!   - Every word contains the folded substring
//!
//! - `language_props`: Tests for the Greek/Spanish heuristic
//!   - One Greek-block character decides
//!   - Everything else is Spanish

mod extractor_props;
mod language_props;
