//! Legacy selection normalization.
//!
//! Selections were persisted in several shapes over time. Every entry is read
//! through [`LegacySelection`] and mapped to a [`CanonicalSelection`]; the
//! canonical shapes are the only ones written back.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use grimoire_domain::{CanonicalSelection, Selections};

/// Every shape a persisted per-level selection has been stored in.
///
/// Variants are tried in declaration order, which is the resolution priority.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegacySelection {
    /// `"Foresight"`
    Bare(String),
    /// `{"mainChoice": "...", "subChoice": "..." | null}`, both keys present
    Pair {
        #[serde(rename = "mainChoice")]
        main_choice: String,
        #[serde(rename = "subChoice", deserialize_with = "required_nullable")]
        sub_choice: Option<String>,
    },
    /// `{"name": "..."}`
    Named { name: String },
    /// `{"selectedChoice": "..."}`
    Selected {
        #[serde(rename = "selectedChoice")]
        selected_choice: String,
    },
    /// `{"choice": "..."}`
    Choice { choice: String },
    /// `{"mainChoice": "..."}` with no `subChoice` key
    MainOnly {
        #[serde(rename = "mainChoice")]
        main_choice: String,
    },
    /// Anything else
    Unrecognized(Value),
}

/// An `Option` field whose key must be present; only its value may be `null`.
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl LegacySelection {
    /// Classify a raw persisted value.
    pub fn from_value(raw: &Value) -> Self {
        Self::deserialize(raw).unwrap_or_else(|_| Self::Unrecognized(raw.clone()))
    }
}

/// Result of normalizing one persisted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedSelection {
    /// A known shape
    Canonical(CanonicalSelection),
    /// An unknown shape, kept as its JSON text so the map stays comparable.
    /// It never names a real choice, so it never counts as complete.
    Unrecognized(CanonicalSelection),
    /// `null` or a blank name: treated as no selection
    Empty,
}

impl NormalizedSelection {
    pub fn into_selection(self) -> Option<CanonicalSelection> {
        match self {
            Self::Canonical(s) | Self::Unrecognized(s) => Some(s),
            Self::Empty => None,
        }
    }
}

/// Normalize a single persisted value.
pub fn normalize_selection(raw: &Value) -> NormalizedSelection {
    if raw.is_null() {
        return NormalizedSelection::Empty;
    }

    let name = match LegacySelection::from_value(raw) {
        LegacySelection::Pair {
            main_choice,
            sub_choice,
        } => {
            if main_choice.trim().is_empty() {
                return NormalizedSelection::Empty;
            }
            return NormalizedSelection::Canonical(CanonicalSelection::WithSubChoice {
                main_choice,
                sub_choice,
            });
        }
        LegacySelection::MainOnly { main_choice } => {
            if main_choice.trim().is_empty() {
                return NormalizedSelection::Empty;
            }
            return NormalizedSelection::Canonical(CanonicalSelection::WithSubChoice {
                main_choice,
                sub_choice: None,
            });
        }
        LegacySelection::Bare(name)
        | LegacySelection::Named { name }
        | LegacySelection::Selected {
            selected_choice: name,
        }
        | LegacySelection::Choice { choice: name } => name,
        LegacySelection::Unrecognized(value) => {
            return NormalizedSelection::Unrecognized(CanonicalSelection::Choice(
                value.to_string(),
            ));
        }
    };

    if name.trim().is_empty() {
        NormalizedSelection::Empty
    } else {
        NormalizedSelection::Canonical(CanonicalSelection::Choice(name))
    }
}

/// A raw selection map after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSelections {
    pub selections: Selections,
    /// Levels whose value matched no known shape
    pub unrecognized: Vec<u8>,
    /// Keys that are not level numbers
    pub skipped_keys: Vec<String>,
}

impl NormalizedSelections {
    pub fn is_clean(&self) -> bool {
        self.unrecognized.is_empty() && self.skipped_keys.is_empty()
    }
}

/// Normalize a persisted `level -> value` map into canonical selections.
///
/// Normalizing the serialized output again yields the same selections.
pub fn normalize_selections(raw: &Map<String, Value>) -> NormalizedSelections {
    let mut result = NormalizedSelections::default();

    for (key, value) in raw {
        let level = match key.trim().parse::<u8>() {
            Ok(level) if level >= 1 => level,
            _ => {
                tracing::warn!(key = %key, "Skipping selection entry with a non-level key");
                result.skipped_keys.push(key.clone());
                continue;
            }
        };

        match normalize_selection(value) {
            NormalizedSelection::Canonical(selection) => {
                result.selections.insert(level, selection);
            }
            NormalizedSelection::Unrecognized(selection) => {
                tracing::warn!(
                    level,
                    raw = %value,
                    "Unrecognized selection shape; stored as text and treated as incomplete"
                );
                result.unrecognized.push(level);
                result.selections.insert(level, selection);
            }
            NormalizedSelection::Empty => {}
        }
    }

    result.unrecognized.sort_unstable();
    result
}
