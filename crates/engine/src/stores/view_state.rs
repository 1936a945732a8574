//! UI expansion state, keyed by subclass name.
//!
//! Purely presentational: nothing here is persisted or consulted by the
//! completion rules, and it never lives inside a selection map.

use std::collections::BTreeSet;

use dashmap::DashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CardState {
    expanded: bool,
    levels: BTreeSet<u8>,
}

/// Which subclass cards and level panels are currently expanded.
#[derive(Default)]
pub struct ExpansionState {
    cards: DashMap<String, CardState>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a subclass card and return whether it is now expanded.
    pub fn toggle_card(&self, subclass: &str) -> bool {
        let mut card = self.cards.entry(subclass.to_string()).or_default();
        card.expanded = !card.expanded;
        card.expanded
    }

    pub fn is_card_expanded(&self, subclass: &str) -> bool {
        self.cards.get(subclass).is_some_and(|card| card.expanded)
    }

    /// Flip one level panel of a subclass and return whether it is now expanded.
    pub fn toggle_level(&self, subclass: &str, level: u8) -> bool {
        let mut card = self.cards.entry(subclass.to_string()).or_default();
        if card.levels.remove(&level) {
            false
        } else {
            card.levels.insert(level);
            true
        }
    }

    pub fn is_level_expanded(&self, subclass: &str, level: u8) -> bool {
        self.cards
            .get(subclass)
            .is_some_and(|card| card.levels.contains(&level))
    }

    /// Expanded level panels of a subclass, ascending.
    pub fn expanded_levels(&self, subclass: &str) -> Vec<u8> {
        self.cards
            .get(subclass)
            .map(|card| card.levels.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Collapse everything for one subclass.
    pub fn collapse(&self, subclass: &str) {
        self.cards.remove(subclass);
    }

    /// Collapse everything.
    pub fn clear(&self) {
        self.cards.clear();
    }
}
