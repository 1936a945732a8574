//! SubclassProgression aggregate - a character's subclass pick and per-level selections
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: the selection map is only changed through the methods below
//! - **Outcome events**: every mutation returns what happened instead of `()`
//! - **Canonical writes**: only bare names or `{mainChoice, subChoice}` pairs are stored

use crate::events::{SelectionChange, SubclassChange};
use crate::value_objects::{CanonicalSelection, Selections};

/// The subclass a character follows and the picks made within it.
///
/// # Invariants
///
/// - when no subclass is selected, the selection map is empty
///   (`deselect_subclass` clears both together)
/// - picking a subclass always starts from an empty selection map
///
/// # Example
///
/// ```
/// use grimoire_domain::aggregates::SubclassProgression;
///
/// let mut progression = SubclassProgression::new();
/// progression.select_subclass("Transfiguration");
/// progression.set_main_choice(1, "Elementalist");
/// progression.set_sub_choice(1, "Elementalist", "Fire");
///
/// let pick = progression.selection(1).unwrap();
/// assert_eq!(pick.main_choice(), "Elementalist");
/// assert_eq!(pick.sub_choice(), Some("Fire"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubclassProgression {
    subclass: Option<String>,
    selections: Selections,
}

impl SubclassProgression {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// A character with no subclass picked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted parts.
    ///
    /// Selections stored without a subclass are dropped to keep the invariant.
    pub fn from_parts(subclass: Option<String>, selections: Selections) -> Self {
        match subclass {
            Some(name) => Self {
                subclass: Some(name),
                selections,
            },
            None => Self::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn subclass(&self) -> Option<&str> {
        self.subclass.as_deref()
    }

    #[inline]
    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    #[inline]
    pub fn selection(&self, level: u8) -> Option<&CanonicalSelection> {
        self.selections.get(level)
    }

    /// Split into persisted parts.
    pub fn into_parts(self) -> (Option<String>, Selections) {
        (self.subclass, self.selections)
    }

    // =========================================================================
    // Selection mutations
    // =========================================================================

    /// Pick a main choice at `level`.
    ///
    /// Re-picking the main choice already stored in a `{mainChoice, subChoice}`
    /// pair keeps the pair (and its sub-choice). Any other pick replaces the
    /// stored value with the bare name, dropping a previous sub-choice.
    pub fn set_main_choice(&mut self, level: u8, choice: impl Into<String>) -> SelectionChange {
        let choice = choice.into();

        match self.selections.get(level) {
            Some(CanonicalSelection::WithSubChoice { main_choice, .. }) if *main_choice == choice => {
                return SelectionChange::Unchanged { level };
            }
            Some(CanonicalSelection::Choice(current)) if *current == choice => {
                return SelectionChange::Unchanged { level };
            }
            _ => {}
        }

        self.write(level, CanonicalSelection::Choice(choice))
    }

    /// Record a nested sub-choice under `main_choice` at `level`.
    ///
    /// Always overwrites whatever was stored at the level.
    pub fn set_sub_choice(
        &mut self,
        level: u8,
        main_choice: impl Into<String>,
        sub_choice: impl Into<String>,
    ) -> SelectionChange {
        let selection = CanonicalSelection::with_sub_choice(main_choice, sub_choice);
        if self.selections.get(level) == Some(&selection) {
            return SelectionChange::Unchanged { level };
        }
        self.write(level, selection)
    }

    /// Remove the pick at `level`.
    pub fn clear_choice(&mut self, level: u8) -> SelectionChange {
        match self.selections.remove(level) {
            Some(from) => SelectionChange::Cleared { level, from },
            None => SelectionChange::Unchanged { level },
        }
    }

    fn write(&mut self, level: u8, to: CanonicalSelection) -> SelectionChange {
        match self.selections.insert(level, to.clone()) {
            Some(from) => SelectionChange::Replaced { level, from, to },
            None => SelectionChange::Recorded { level, to },
        }
    }

    // =========================================================================
    // Subclass mutations
    // =========================================================================

    /// Pick a subclass, discarding every earlier selection.
    ///
    /// The reset is total, even when the same subclass is picked again.
    pub fn select_subclass(&mut self, name: impl Into<String>) -> SubclassChange {
        let discarded_selections = self.selections.len();
        self.selections.clear();
        let to = name.into();
        let from = self.subclass.replace(to.clone());

        SubclassChange::Selected {
            from,
            to,
            discarded_selections,
        }
    }

    /// Drop the subclass and all of its selections.
    pub fn deselect_subclass(&mut self) -> SubclassChange {
        let discarded_selections = self.selections.len();
        self.selections.clear();

        match self.subclass.take() {
            Some(from) => SubclassChange::Deselected {
                from,
                discarded_selections,
            },
            None => SubclassChange::NothingSelected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_subclass() -> SubclassProgression {
        let mut progression = SubclassProgression::new();
        progression.select_subclass("Transfiguration");
        progression
    }

    #[test]
    fn first_pick_is_recorded_as_bare_name() {
        let mut progression = with_subclass();
        let change = progression.set_main_choice(1, "Elementalist");

        assert_eq!(
            change,
            SelectionChange::Recorded {
                level: 1,
                to: CanonicalSelection::choice("Elementalist"),
            }
        );
        assert_eq!(
            progression.selection(1),
            Some(&CanonicalSelection::choice("Elementalist"))
        );
    }

    #[test]
    fn repicking_same_main_choice_keeps_sub_choice() {
        let mut progression = with_subclass();
        progression.set_sub_choice(1, "Elementalist", "Fire");

        let change = progression.set_main_choice(1, "Elementalist");

        assert_eq!(change, SelectionChange::Unchanged { level: 1 });
        assert_eq!(
            progression.selection(1),
            Some(&CanonicalSelection::with_sub_choice("Elementalist", "Fire"))
        );
    }

    #[test]
    fn switching_main_choice_drops_sub_choice() {
        let mut progression = with_subclass();
        progression.set_sub_choice(1, "Elementalist", "Fire");

        let change = progression.set_main_choice(1, "Shapeshifter");

        assert_eq!(
            change,
            SelectionChange::Replaced {
                level: 1,
                from: CanonicalSelection::with_sub_choice("Elementalist", "Fire"),
                to: CanonicalSelection::choice("Shapeshifter"),
            }
        );
        assert_eq!(progression.selection(1).and_then(|s| s.sub_choice()), None);
    }

    #[test]
    fn repicking_same_bare_choice_is_unchanged() {
        let mut progression = with_subclass();
        progression.set_main_choice(6, "Duelist");
        assert!(!progression.set_main_choice(6, "Duelist").is_change());
    }

    #[test]
    fn sub_choice_overwrites_any_previous_value() {
        let mut progression = with_subclass();
        progression.set_main_choice(1, "Shapeshifter");

        let change = progression.set_sub_choice(1, "Elementalist", "Water");
        assert!(matches!(change, SelectionChange::Replaced { level: 1, .. }));

        progression.set_sub_choice(1, "Elementalist", "Earth");
        assert_eq!(
            progression.selection(1),
            Some(&CanonicalSelection::with_sub_choice("Elementalist", "Earth"))
        );
    }

    #[test]
    fn clear_choice_removes_level() {
        let mut progression = with_subclass();
        progression.set_main_choice(6, "Duelist");

        assert!(matches!(
            progression.clear_choice(6),
            SelectionChange::Cleared { level: 6, .. }
        ));
        assert!(progression.selection(6).is_none());
        assert_eq!(progression.clear_choice(6), SelectionChange::Unchanged { level: 6 });
    }

    #[test]
    fn selecting_subclass_resets_all_choices() {
        let mut progression = with_subclass();
        progression.set_main_choice(1, "Elementalist");
        progression.set_main_choice(6, "Duelist");

        let change = progression.select_subclass("Charms");

        assert_eq!(
            change,
            SubclassChange::Selected {
                from: Some("Transfiguration".into()),
                to: "Charms".into(),
                discarded_selections: 2,
            }
        );
        assert_eq!(progression.subclass(), Some("Charms"));
        assert!(progression.selections().is_empty());
    }

    #[test]
    fn reselecting_same_subclass_still_resets() {
        let mut progression = with_subclass();
        progression.set_main_choice(1, "Elementalist");

        progression.select_subclass("Transfiguration");
        assert!(progression.selections().is_empty());
    }

    #[test]
    fn deselect_clears_subclass_and_selections() {
        let mut progression = with_subclass();
        progression.set_main_choice(1, "Elementalist");

        assert_eq!(
            progression.deselect_subclass(),
            SubclassChange::Deselected {
                from: "Transfiguration".into(),
                discarded_selections: 1,
            }
        );
        assert_eq!(progression.subclass(), None);
        assert!(progression.selections().is_empty());
        assert_eq!(progression.deselect_subclass(), SubclassChange::NothingSelected);
    }

    #[test]
    fn from_parts_drops_orphan_selections() {
        let selections: Selections = [(1, CanonicalSelection::choice("Foresight"))]
            .into_iter()
            .collect();

        let orphan = SubclassProgression::from_parts(None, selections.clone());
        assert!(orphan.selections().is_empty());

        let restored = SubclassProgression::from_parts(Some("Divination".into()), selections);
        assert_eq!(restored.subclass(), Some("Divination"));
        assert_eq!(restored.selections().len(), 1);
    }
}
