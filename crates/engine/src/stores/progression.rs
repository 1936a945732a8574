//! Per-character progression storage.
//!
//! Each character's selection map has exactly one writer at a time: every
//! mutation runs while holding that entry's shard lock.

use dashmap::DashMap;

use grimoire_domain::{CharacterId, SubclassProgression};

/// Concurrent map of character progressions.
pub struct ProgressionStore {
    inner: DashMap<CharacterId, SubclassProgression>,
}

impl ProgressionStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Snapshot of a character's progression, if one was ever stored.
    pub fn get(&self, character: CharacterId) -> Option<SubclassProgression> {
        self.inner.get(&character).map(|entry| entry.value().clone())
    }

    /// Snapshot of a character's progression, empty when unknown.
    pub fn get_or_default(&self, character: CharacterId) -> SubclassProgression {
        self.get(character).unwrap_or_default()
    }

    /// Run a mutation against an existing progression under its entry lock.
    ///
    /// Returns `None` without creating an entry when the character is unknown.
    pub fn update<R>(
        &self,
        character: CharacterId,
        mutate: impl FnOnce(&mut SubclassProgression) -> R,
    ) -> Option<R> {
        let mut entry = self.inner.get_mut(&character)?;
        Some(mutate(entry.value_mut()))
    }

    /// Like [`Self::update`], but unknown characters start from an empty progression.
    pub fn upsert<R>(
        &self,
        character: CharacterId,
        mutate: impl FnOnce(&mut SubclassProgression) -> R,
    ) -> R {
        let mut entry = self.inner.entry(character).or_default();
        mutate(entry.value_mut())
    }

    /// Replace a character's progression wholesale.
    pub fn replace(&self, character: CharacterId, progression: SubclassProgression) {
        self.inner.insert(character, progression);
    }

    pub fn remove(&self, character: CharacterId) -> Option<SubclassProgression> {
        self.inner.remove(&character).map(|(_, progression)| progression)
    }

    pub fn contains(&self, character: CharacterId) -> bool {
        self.inner.contains_key(&character)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ProgressionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn unknown_character_reads_as_empty() {
        let store = ProgressionStore::new();
        let character = CharacterId::new();

        assert!(store.get(character).is_none());
        assert_eq!(store.get_or_default(character), SubclassProgression::new());
        assert!(!store.contains(character));
    }

    #[test]
    fn upsert_creates_and_update_mutates_entry() {
        let store = ProgressionStore::new();
        let character = CharacterId::new();

        store.upsert(character, |p| p.select_subclass("Charms"));
        let change = store.update(character, |p| p.set_main_choice(1, "Duelist"));
        assert!(change.is_some_and(|c| c.is_change()));

        let progression = store.get(character).expect("stored");
        assert_eq!(progression.subclass(), Some("Charms"));
        assert_eq!(progression.selections().len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_skips_unknown_characters() {
        let store = ProgressionStore::new();
        let character = CharacterId::new();

        assert!(store.update(character, |p| p.clear_choice(1)).is_none());
        assert!(!store.contains(character));
        assert!(store.is_empty());
    }

    #[test]
    fn characters_are_isolated() {
        let store = ProgressionStore::new();
        let first = CharacterId::new();
        let second = CharacterId::new();

        store.upsert(first, |p| p.select_subclass("Charms"));
        store.upsert(second, |p| p.select_subclass("Divination"));

        assert_eq!(store.get_or_default(first).subclass(), Some("Charms"));
        assert_eq!(store.get_or_default(second).subclass(), Some("Divination"));
    }

    #[test]
    fn remove_returns_last_state() {
        let store = ProgressionStore::new();
        let character = CharacterId::new();
        store.upsert(character, |p| p.select_subclass("Charms"));

        let removed = store.remove(character).expect("was stored");
        assert_eq!(removed.subclass(), Some("Charms"));
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let store = Arc::new(ProgressionStore::new());
        let character = CharacterId::new();
        store.upsert(character, |p| p.select_subclass("Charms"));

        let handles: Vec<_> = (1..=8u8)
            .map(|level| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.update(character, |p| p.set_main_choice(level, "Duelist"));
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread finished");
        }

        assert_eq!(store.get_or_default(character).selections().len(), 8);
    }
}
