//! Prompt and response-schema construction for the morphology request.

use serde_json::{json, Value};

use super::types::{Gender, Mood, Number, Person, Tense};
use crate::core::language::Language;

/// Instruction prompt asking for one record per word.
pub fn build_prompt(words: &[String], language: Language) -> String {
    format!(
        "You are an expert linguist. Perform a morphological analysis of each of the \
         following {language} words: {words}.\n\
         For every word return an object with the word exactly as given, its lemma, \
         its part of speech, and its features: gender, number, tense, person and mood. \
         Use \"indeterminate\" for any feature that does not apply or cannot be decided. \
         Answer with a JSON array only, one object per word, in the order given.",
        language = language.label(),
        words = words.join(", "),
    )
}

/// Response schema in the generative-language API's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "word": { "type": "STRING" },
                "lemma": { "type": "STRING" },
                "part_of_speech": { "type": "STRING" },
                "features": {
                    "type": "OBJECT",
                    "properties": {
                        "gender": enum_property(Gender::VALUES),
                        "number": enum_property(Number::VALUES),
                        "tense": enum_property(Tense::VALUES),
                        "person": enum_property(Person::VALUES),
                        "mood": enum_property(Mood::VALUES),
                    },
                    "required": ["gender", "number", "tense", "person", "mood"]
                }
            },
            "required": ["word", "lemma", "part_of_speech", "features"]
        }
    })
}

/// Full `generateContent` request body.
pub fn request_body(words: &[String], language: Language) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(words, language) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

fn enum_property(values: &[&str]) -> Value {
    json!({ "type": "STRING", "enum": values })
}
