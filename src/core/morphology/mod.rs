//! Morphology Client Module
//!
//! Sends extracted words to a remote generative-language model and parses
//! the schema-constrained annotations it returns.
//!
//! # Module Structure
//!
//! - `client`: `MorphologyClient` and envelope parsing
//! - `retry`: bounded retry state machine and status classification
//! - `prompt`: instruction prompt and response schema
//! - `types`: `MorphologyRecord` and the feature enums
//! - `error`: `MorphologyError`

pub mod client;
pub mod error;
pub mod prompt;
pub mod retry;
pub mod types;

pub use client::{parse_response, MorphologyClient};
pub use error::{MorphologyError, Result};
pub use retry::{RetryPolicy, RetryState, StatusClass};
pub use types::{Features, Gender, Mood, MorphologyRecord, Number, Person, Tense};
