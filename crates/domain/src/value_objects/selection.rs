//! Canonical selection value objects.
//!
//! A character's picks for one subclass are stored per level as either a bare
//! option name or a `{mainChoice, subChoice}` pair. These are the only shapes
//! ever written back to persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The normalized pick recorded at one level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalSelection {
    /// A main choice with no dependent pick recorded
    Choice(String),
    /// A main choice that carries (or awaits) a nested sub-choice
    WithSubChoice {
        #[serde(rename = "mainChoice")]
        main_choice: String,
        #[serde(rename = "subChoice")]
        sub_choice: Option<String>,
    },
}

impl CanonicalSelection {
    pub fn choice(name: impl Into<String>) -> Self {
        Self::Choice(name.into())
    }

    pub fn with_sub_choice(main_choice: impl Into<String>, sub_choice: impl Into<String>) -> Self {
        Self::WithSubChoice {
            main_choice: main_choice.into(),
            sub_choice: Some(sub_choice.into()),
        }
    }

    /// Name of the main choice, whatever the shape.
    pub fn main_choice(&self) -> &str {
        match self {
            Self::Choice(name) => name,
            Self::WithSubChoice { main_choice, .. } => main_choice,
        }
    }

    /// The recorded sub-choice, if any.
    pub fn sub_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(_) => None,
            Self::WithSubChoice { sub_choice, .. } => sub_choice.as_deref(),
        }
    }
}

/// Per-level selections for one subclass, ordered by level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(BTreeMap<u8, CanonicalSelection>);

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: u8) -> Option<&CanonicalSelection> {
        self.0.get(&level)
    }

    pub fn insert(
        &mut self,
        level: u8,
        selection: CanonicalSelection,
    ) -> Option<CanonicalSelection> {
        self.0.insert(level, selection)
    }

    pub fn remove(&mut self, level: u8) -> Option<CanonicalSelection> {
        self.0.remove(&level)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &CanonicalSelection)> {
        self.0.iter().map(|(level, sel)| (*level, sel))
    }

    /// Whether `choice_name` is picked, as a main or sub-choice, at any level below `before`.
    pub fn has_choice_before(&self, choice_name: &str, before: u8) -> bool {
        self.0.range(..before).any(|(_, sel)| {
            sel.main_choice() == choice_name || sel.sub_choice() == Some(choice_name)
        })
    }
}

impl From<BTreeMap<u8, CanonicalSelection>> for Selections {
    fn from(map: BTreeMap<u8, CanonicalSelection>) -> Self {
        Self(map)
    }
}

impl FromIterator<(u8, CanonicalSelection)> for Selections {
    fn from_iter<I: IntoIterator<Item = (u8, CanonicalSelection)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Selections {
    type Item = (u8, CanonicalSelection);
    type IntoIter = std::collections::btree_map::IntoIter<u8, CanonicalSelection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_cover_both_shapes() {
        let bare = CanonicalSelection::choice("Foresight");
        assert_eq!(bare.main_choice(), "Foresight");
        assert_eq!(bare.sub_choice(), None);

        let pair = CanonicalSelection::with_sub_choice("Elementalist", "Fire");
        assert_eq!(pair.main_choice(), "Elementalist");
        assert_eq!(pair.sub_choice(), Some("Fire"));

        let pending = CanonicalSelection::WithSubChoice {
            main_choice: "Elementalist".into(),
            sub_choice: None,
        };
        assert_eq!(pending.sub_choice(), None);
    }

    #[test]
    fn serializes_to_persisted_shapes() {
        let mut selections = Selections::new();
        selections.insert(1, CanonicalSelection::choice("Foresight"));
        selections.insert(6, CanonicalSelection::with_sub_choice("Elementalist", "Fire"));

        let value = serde_json::to_value(&selections).expect("serializable");
        assert_eq!(
            value,
            json!({
                "1": "Foresight",
                "6": { "mainChoice": "Elementalist", "subChoice": "Fire" }
            })
        );
    }

    #[test]
    fn deserializes_canonical_shapes() {
        let selections: Selections = serde_json::from_value(json!({
            "1": "Foresight",
            "6": { "mainChoice": "Elementalist", "subChoice": null }
        }))
        .expect("canonical map");

        assert_eq!(selections.get(1), Some(&CanonicalSelection::choice("Foresight")));
        assert_eq!(selections.get(6).map(|s| s.main_choice()), Some("Elementalist"));
        assert_eq!(selections.get(6).and_then(|s| s.sub_choice()), None);
    }

    #[test]
    fn choice_lookup_respects_level_bound() {
        let selections: Selections = [
            (1, CanonicalSelection::choice("Curse-Breaking")),
            (3, CanonicalSelection::with_sub_choice("Elementalist", "Fire")),
            (6, CanonicalSelection::choice("Ward-Breaker")),
        ]
        .into_iter()
        .collect();

        assert!(selections.has_choice_before("Curse-Breaking", 6));
        assert!(!selections.has_choice_before("Curse-Breaking", 1));
        assert!(!selections.has_choice_before("Ward-Breaker", 6));
        assert!(selections.has_choice_before("Fire", 4));
    }
}
