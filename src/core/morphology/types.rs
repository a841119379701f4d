//! Morphology record types.
//!
//! Every feature is a closed enum with an `Indeterminate` fallback. Values
//! the model invents, omits, or sends as `null` deserialize to
//! `Indeterminate` instead of failing the whole response.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Morphological annotation for a single word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyRecord {
    pub word: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lemma: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_of_speech: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Features,
}

/// Grammatical features assigned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    #[serde(deserialize_with = "null_as_default")]
    pub gender: Gender,
    #[serde(deserialize_with = "null_as_default")]
    pub number: Number,
    #[serde(deserialize_with = "null_as_default")]
    pub tense: Tense,
    #[serde(deserialize_with = "null_as_default")]
    pub person: Person,
    #[serde(deserialize_with = "null_as_default")]
    pub mood: Mood,
}

/// `null` reads as the field's default (`Indeterminate` for features).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Declares a lowercase-serialized feature enum with an `Indeterminate`
/// catch-all and the list of its wire values.
macro_rules! feature_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
            #[default]
            #[serde(other)]
            Indeterminate,
        }

        impl $name {
            /// Wire values accepted in the response schema.
            pub const VALUES: &'static [&'static str] = &[$($wire,)+ "indeterminate"];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Indeterminate => "indeterminate",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

feature_enum! {
    /// Grammatical gender.
    Gender {
        Masculine => "masculine",
        Feminine => "feminine",
        Neuter => "neuter",
        Common => "common",
    }
}

feature_enum! {
    /// Grammatical number.
    Number {
        Singular => "singular",
        Plural => "plural",
        Dual => "dual",
    }
}

feature_enum! {
    /// Verb tense.
    Tense {
        Present => "present",
        Past => "past",
        Imperfect => "imperfect",
        Preterite => "preterite",
        Future => "future",
        Perfect => "perfect",
        Pluperfect => "pluperfect",
        Aorist => "aorist",
        Conditional => "conditional",
    }
}

feature_enum! {
    /// Verb person.
    Person {
        First => "first",
        Second => "second",
        Third => "third",
    }
}

feature_enum! {
    /// Verb mood (non-finite forms included).
    Mood {
        Indicative => "indicative",
        Subjunctive => "subjunctive",
        Imperative => "imperative",
        Optative => "optative",
        Infinitive => "infinitive",
        Participle => "participle",
        Gerund => "gerund",
    }
}
