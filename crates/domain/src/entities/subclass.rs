//! Subclass catalog entities.
//!
//! A subclass is a named specialization tree: for each level it unlocks a set of
//! informational features and a set of choices the player must resolve. The
//! catalog is built once at load and never mutated afterwards.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::DomainError;

/// A subclass feature that is granted automatically and never selected.
///
/// # Simple Data Struct
///
/// Data-carrying struct; its invariants (non-empty name and description) are
/// checked when the owning [`Subclass`] is constructed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Display name of the feature
    pub name: String,
    /// Full description of what the feature does
    pub description: String,
}

impl Feature {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A sub-choice that is only resolved after its parent [`Choice`] is picked.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NestedOption {
    pub name: String,
    pub description: String,
}

impl NestedOption {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One selectable option at a level.
///
/// Picking a choice with `nested_choices` requires a second, dependent pick
/// among those options before the level counts as complete.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Display name, also the identifier stored in selections
    pub name: String,
    pub description: String,
    /// Sub-choices; empty when the choice needs no secondary pick
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested_choices: Vec<NestedOption>,
    /// Display names of choices from earlier levels this choice builds on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
}

impl Choice {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            nested_choices: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Attach nested sub-choices.
    pub fn with_nested_choices(mut self, nested: Vec<NestedOption>) -> Self {
        self.nested_choices = nested;
        self
    }

    /// Attach prerequisite choice names.
    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    /// Whether picking this choice requires a secondary pick.
    pub fn has_nested_choices(&self) -> bool {
        !self.nested_choices.is_empty()
    }

    /// Find a nested option by name.
    pub fn nested_option(&self, name: &str) -> Option<&NestedOption> {
        self.nested_choices.iter().find(|n| n.name == name)
    }
}

/// The features and choices unlocked at one character level.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LevelBlock {
    pub level: u8,
    pub features: Vec<Feature>,
    pub choices: Vec<Choice>,
}

impl LevelBlock {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            features: Vec::new(),
            choices: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Whether this level asks the player to choose something.
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Find a choice at this level by display name.
    pub fn choice(&self, name: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.name == name)
    }

    /// Display names of every choice at this level, in declaration order.
    pub fn choice_names(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.name.clone()).collect()
    }
}

/// A subclass and its per-level progression tree.
///
/// # Invariants
///
/// - `name` is non-empty after trimming
/// - every block level is `>= 1` and appears at most once
/// - blocks are stored in ascending level order
/// - features, choices and nested options have non-empty names and descriptions
/// - choice names are unique within a block, nested option names are unique
///   within a choice
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subclass {
    name: String,
    description: String,
    levels: Vec<LevelBlock>,
}

impl Subclass {
    /// Build a validated subclass.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedCatalogEntry` naming the subclass when any
    /// invariant listed on the type is broken.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        mut levels: Vec<LevelBlock>,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::malformed("<unnamed>", "subclass name is empty"));
        }

        let mut seen_levels = HashSet::new();
        for block in &levels {
            if block.level == 0 {
                return Err(DomainError::malformed(&name, "level block has level 0"));
            }
            if !seen_levels.insert(block.level) {
                return Err(DomainError::malformed(
                    &name,
                    format!("level {} is declared more than once", block.level),
                ));
            }
            validate_block(&name, block)?;
        }

        levels.sort_by_key(|b| b.level);

        Ok(Self {
            name,
            description: description.into(),
            levels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Level blocks in ascending level order.
    pub fn levels(&self) -> &[LevelBlock] {
        &self.levels
    }

    /// The block unlocked at exactly `level`, if any.
    pub fn level_block(&self, level: u8) -> Option<&LevelBlock> {
        self.levels
            .binary_search_by_key(&level, |b| b.level)
            .ok()
            .map(|idx| &self.levels[idx])
    }

    /// Every declared level number, ascending.
    pub fn level_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels.iter().map(|b| b.level)
    }
}

fn validate_block(subclass: &str, block: &LevelBlock) -> Result<(), DomainError> {
    let level = block.level;

    for feature in &block.features {
        if feature.name.trim().is_empty() {
            return Err(DomainError::malformed(
                subclass,
                format!("feature at level {} has no name", level),
            ));
        }
        if feature.description.trim().is_empty() {
            return Err(DomainError::malformed(
                subclass,
                format!("feature '{}' at level {} has no description", feature.name, level),
            ));
        }
    }

    let mut choice_names = HashSet::new();
    for choice in &block.choices {
        if choice.name.trim().is_empty() {
            return Err(DomainError::malformed(
                subclass,
                format!("choice at level {} has no name", level),
            ));
        }
        if choice.description.trim().is_empty() {
            return Err(DomainError::malformed(
                subclass,
                format!("choice '{}' at level {} has no description", choice.name, level),
            ));
        }
        if !choice_names.insert(choice.name.as_str()) {
            return Err(DomainError::malformed(
                subclass,
                format!("choice '{}' appears twice at level {}", choice.name, level),
            ));
        }

        let mut nested_names = HashSet::new();
        for nested in &choice.nested_choices {
            if nested.name.trim().is_empty() || nested.description.trim().is_empty() {
                return Err(DomainError::malformed(
                    subclass,
                    format!(
                        "nested option of '{}' at level {} is missing a name or description",
                        choice.name, level
                    ),
                ));
            }
            if !nested_names.insert(nested.name.as_str()) {
                return Err(DomainError::malformed(
                    subclass,
                    format!(
                        "nested option '{}' appears twice under '{}'",
                        nested.name, choice.name
                    ),
                ));
            }
        }

        if choice.requirements.iter().any(|r| r.trim().is_empty()) {
            return Err(DomainError::malformed(
                subclass,
                format!("choice '{}' declares an empty requirement", choice.name),
            ));
        }
    }

    Ok(())
}
