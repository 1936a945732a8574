//! Subclass progression domain events
//!
//! These enums communicate what happened when a character's subclass
//! selections were modified, allowing callers to react appropriately.

use crate::value_objects::CanonicalSelection;

/// Outcome of writing a pick at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// The level had no selection before
    Recorded { level: u8, to: CanonicalSelection },
    /// A previous selection was overwritten
    Replaced {
        level: u8,
        from: CanonicalSelection,
        to: CanonicalSelection,
    },
    /// The stored value already matched; nothing was written
    Unchanged { level: u8 },
    /// A selection was removed
    Cleared { level: u8, from: CanonicalSelection },
}

impl SelectionChange {
    pub fn level(&self) -> u8 {
        match self {
            Self::Recorded { level, .. }
            | Self::Replaced { level, .. }
            | Self::Unchanged { level }
            | Self::Cleared { level, .. } => *level,
        }
    }

    /// Whether the selection map was modified.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}

/// Outcome of picking or dropping a subclass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubclassChange {
    /// A subclass was picked; all earlier selections were discarded
    Selected {
        from: Option<String>,
        to: String,
        discarded_selections: usize,
    },
    /// The subclass was dropped along with its selections
    Deselected {
        from: String,
        discarded_selections: usize,
    },
    /// Deselect requested while no subclass was picked
    NothingSelected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_reported_for_every_variant() {
        let pick = CanonicalSelection::choice("Duelist");
        assert_eq!(
            SelectionChange::Recorded {
                level: 6,
                to: pick.clone()
            }
            .level(),
            6
        );
        assert_eq!(SelectionChange::Unchanged { level: 3 }.level(), 3);
        assert_eq!(SelectionChange::Cleared { level: 1, from: pick }.level(), 1);
    }

    #[test]
    fn unchanged_is_not_a_change() {
        assert!(!SelectionChange::Unchanged { level: 1 }.is_change());
        assert!(SelectionChange::Recorded {
            level: 1,
            to: CanonicalSelection::choice("Duelist"),
        }
        .is_change());
    }
}
