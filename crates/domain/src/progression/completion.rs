//! Choice completion: which unlocked choice levels still need a pick.
//!
//! Recomputed from scratch on every call. Callers must re-run it whenever the
//! character level or the selection map changes.
//!
//! A recorded value only satisfies a level when it names a choice that level
//! offers. This is stricter than treating any recorded value as a pick: a
//! stale or mistyped name is reported as [`MissingReason::UnknownChoice`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::{LevelBlock, Subclass};
use crate::progression::level_gate::available_levels;
use crate::value_objects::{CanonicalSelection, CharacterLevel, Selections};

/// Why a level is reported as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    /// Nothing is recorded for the level
    NoSelection,
    /// The picked option needs a nested sub-choice that is not recorded yet
    SubChoiceRequired,
    /// The recorded value names no choice offered at this level
    UnknownChoice,
    /// The recorded sub-choice is not one of the picked option's nested options
    UnknownSubChoice,
}

/// What the player still has to pick at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingChoices {
    pub choice_count: usize,
    /// Options on offer: the level's choices, or the nested options when a
    /// sub-choice is what is missing
    pub choices: Vec<String>,
    pub reason: MissingReason,
}

impl MissingChoices {
    fn new(choices: Vec<String>, reason: MissingReason) -> Self {
        Self {
            choice_count: choices.len(),
            choices,
            reason,
        }
    }
}

/// A selected choice whose declared prerequisite was not picked at an earlier level.
///
/// Advisory only: it never makes a level missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetPrerequisite {
    pub level: u8,
    pub choice: String,
    pub requirement: String,
}

/// Completion report for one subclass at one character level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub character_level: CharacterLevel,
    /// Number of unlocked levels that carry at least one choice
    pub total: usize,
    pub levels_with_choices: Vec<u8>,
    /// Levels still lacking a complete selection, ascending
    pub missing: Vec<u8>,
    pub missing_by_level: BTreeMap<u8, MissingChoices>,
    pub is_complete: bool,
    pub unmet_prerequisites: Vec<UnmetPrerequisite>,
}

impl CompletionStatus {
    pub fn is_missing(&self, level: u8) -> bool {
        self.missing_by_level.contains_key(&level)
    }

    /// Number of unlocked choice levels that are fully resolved.
    pub fn completed(&self) -> usize {
        self.total - self.missing.len()
    }
}

/// Evaluate which unlocked choice levels of `subclass` are still unresolved.
pub fn required_choices(
    subclass: &Subclass,
    level: CharacterLevel,
    selections: &Selections,
) -> CompletionStatus {
    let levels_with_choices: Vec<u8> = available_levels(subclass, level)
        .into_iter()
        .filter(|l| subclass.level_block(*l).is_some_and(LevelBlock::has_choices))
        .collect();

    let mut missing_by_level = BTreeMap::new();
    let mut unmet_prerequisites = Vec::new();

    for block_level in &levels_with_choices {
        let Some(block) = subclass.level_block(*block_level) else {
            continue;
        };
        let selection = selections.get(*block_level);

        if let Some(gap) = evaluate_level(block, selection) {
            missing_by_level.insert(*block_level, gap);
        }

        if let Some(choice) = selection.and_then(|s| block.choice(s.main_choice())) {
            for requirement in &choice.requirements {
                if !selections.has_choice_before(requirement, *block_level) {
                    unmet_prerequisites.push(UnmetPrerequisite {
                        level: *block_level,
                        choice: choice.name.clone(),
                        requirement: requirement.clone(),
                    });
                }
            }
        }
    }

    let missing: Vec<u8> = missing_by_level.keys().copied().collect();

    CompletionStatus {
        character_level: level,
        total: levels_with_choices.len(),
        levels_with_choices,
        is_complete: missing.is_empty(),
        missing,
        missing_by_level,
        unmet_prerequisites,
    }
}

fn evaluate_level(
    block: &LevelBlock,
    selection: Option<&CanonicalSelection>,
) -> Option<MissingChoices> {
    let Some(selection) = selection else {
        return Some(MissingChoices::new(
            block.choice_names(),
            MissingReason::NoSelection,
        ));
    };

    let Some(choice) = block.choice(selection.main_choice()) else {
        return Some(MissingChoices::new(
            block.choice_names(),
            MissingReason::UnknownChoice,
        ));
    };

    // Only the picked option's own nested choices gate completion.
    if !choice.has_nested_choices() {
        return None;
    }

    let nested_names = || -> Vec<String> {
        choice.nested_choices.iter().map(|n| n.name.clone()).collect()
    };
    match selection.sub_choice() {
        None => Some(MissingChoices::new(
            nested_names(),
            MissingReason::SubChoiceRequired,
        )),
        Some(sub) if choice.nested_option(sub).is_none() => Some(MissingChoices::new(
            nested_names(),
            MissingReason::UnknownSubChoice,
        )),
        Some(_) => None,
    }
}
