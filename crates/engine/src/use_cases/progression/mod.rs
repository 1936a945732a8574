//! Subclass progression use cases.
//!
//! Ties the immutable catalog, the per-character progression store and the
//! domain rules together. Every query is recomputed from current state; no
//! completion result is cached.

mod error;

pub use error::ProgressionError;

use std::sync::Arc;

use serde_json::{Map, Value};

use grimoire_domain::{
    CharacterId, CharacterLevel, CompletionStatus, LevelGate, SelectionChange, Selections,
    Subclass, SubclassChange, SubclassProgression,
};
use grimoire_shared::{LoadedDocument, SelectionDocument};

use crate::infrastructure::importers::Catalog;
use crate::infrastructure::ports::ClockPort;
use crate::stores::ProgressionStore;

/// Progression operations for the UI and persistence collaborators.
pub struct ProgressionUseCases {
    catalog: Arc<Catalog>,
    store: Arc<ProgressionStore>,
    clock: Arc<dyn ClockPort>,
}

impl ProgressionUseCases {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<ProgressionStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            catalog,
            store,
            clock,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn subclass(&self, name: &str) -> Result<Arc<Subclass>, ProgressionError> {
        self.catalog
            .get(name)
            .ok_or_else(|| ProgressionError::SubclassNotFound(name.to_string()))
    }

    // =========================================================================
    // Catalog queries
    // =========================================================================

    /// Block levels of `subclass` unlocked at `level`, ascending.
    pub fn available_levels(
        &self,
        subclass: &str,
        level: u8,
    ) -> Result<Vec<u8>, ProgressionError> {
        Ok(self.level_gate(subclass, level)?.available)
    }

    /// Block levels of `subclass` still locked at `level`, ascending.
    pub fn locked_levels(&self, subclass: &str, level: u8) -> Result<Vec<u8>, ProgressionError> {
        Ok(self.level_gate(subclass, level)?.locked)
    }

    /// Both halves of the level partition at once.
    pub fn level_gate(&self, subclass: &str, level: u8) -> Result<LevelGate, ProgressionError> {
        let subclass = self.subclass(subclass)?;
        let level = CharacterLevel::new(level)?;
        Ok(LevelGate::partition(&subclass, level))
    }

    /// Completion of an arbitrary selection map.
    pub fn required_choices(
        &self,
        subclass: &str,
        level: u8,
        selections: &Selections,
    ) -> Result<CompletionStatus, ProgressionError> {
        let subclass = self.subclass(subclass)?;
        let level = CharacterLevel::new(level)?;
        Ok(grimoire_domain::required_choices(&subclass, level, selections))
    }

    /// Canonicalize a persisted `level -> value` map.
    pub fn normalize_selections(&self, raw: &Map<String, Value>) -> Selections {
        grimoire_shared::normalize_selections(raw).selections
    }

    // =========================================================================
    // Character state
    // =========================================================================

    /// Snapshot of a character's progression.
    pub fn progression(&self, character: CharacterId) -> SubclassProgression {
        self.store.get_or_default(character)
    }

    /// Completion for a stored character at `level`.
    pub fn status(
        &self,
        character: CharacterId,
        level: u8,
    ) -> Result<CompletionStatus, ProgressionError> {
        let progression = self.store.get_or_default(character);
        let name = progression
            .subclass()
            .ok_or(ProgressionError::NoSubclassSelected)?;
        self.required_choices(name, level, progression.selections())
    }

    /// Pick a subclass, discarding all earlier selections.
    pub fn select_subclass(
        &self,
        character: CharacterId,
        name: &str,
    ) -> Result<SubclassChange, ProgressionError> {
        let subclass = self.subclass(name)?;
        let change = self
            .store
            .upsert(character, |p| p.select_subclass(subclass.name()));
        tracing::debug!(%character, ?change, "Subclass selected");
        Ok(change)
    }

    /// Drop the subclass and all of its selections.
    pub fn deselect_subclass(&self, character: CharacterId) -> SubclassChange {
        let change = self
            .store
            .update(character, SubclassProgression::deselect_subclass)
            .unwrap_or(SubclassChange::NothingSelected);
        tracing::debug!(%character, ?change, "Subclass deselected");
        change
    }

    /// Record a main choice at `level`.
    ///
    /// Re-picking the current main choice keeps its sub-choice; any other pick
    /// clears it.
    pub fn set_main_choice(
        &self,
        character: CharacterId,
        level: u8,
        choice: &str,
    ) -> Result<SelectionChange, ProgressionError> {
        let change = self.store.update(character, |p| -> Result<_, ProgressionError> {
            let subclass = self.selected_subclass(p)?;
            let block_has_choice = subclass
                .level_block(level)
                .is_some_and(|b| b.choice(choice).is_some());
            if !block_has_choice {
                return Err(ProgressionError::UnknownChoice {
                    level,
                    choice: choice.to_string(),
                });
            }
            Ok(p.set_main_choice(level, choice))
        });
        let change = change.unwrap_or(Err(ProgressionError::NoSubclassSelected))?;

        tracing::debug!(%character, ?change, "Main choice set");
        Ok(change)
    }

    /// Record a nested sub-choice under `choice` at `level`.
    pub fn set_sub_choice(
        &self,
        character: CharacterId,
        level: u8,
        choice: &str,
        sub_choice: &str,
    ) -> Result<SelectionChange, ProgressionError> {
        let change = self.store.update(character, |p| -> Result<_, ProgressionError> {
            let subclass = self.selected_subclass(p)?;
            let offered = subclass
                .level_block(level)
                .and_then(|b| b.choice(choice))
                .ok_or_else(|| ProgressionError::UnknownChoice {
                    level,
                    choice: choice.to_string(),
                })?;
            if offered.nested_option(sub_choice).is_none() {
                return Err(ProgressionError::UnknownSubChoice {
                    level,
                    choice: choice.to_string(),
                    sub_choice: sub_choice.to_string(),
                });
            }
            Ok(p.set_sub_choice(level, choice, sub_choice))
        });
        let change = change.unwrap_or(Err(ProgressionError::NoSubclassSelected))?;

        tracing::debug!(%character, ?change, "Sub-choice set");
        Ok(change)
    }

    /// Remove the pick at `level`.
    pub fn clear_choice(&self, character: CharacterId, level: u8) -> SelectionChange {
        self.store
            .update(character, |p| p.clear_choice(level))
            .unwrap_or(SelectionChange::Unchanged { level })
    }

    fn selected_subclass(
        &self,
        progression: &SubclassProgression,
    ) -> Result<Arc<Subclass>, ProgressionError> {
        let name = progression
            .subclass()
            .ok_or(ProgressionError::NoSubclassSelected)?;
        self.subclass(name)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Restore a character from a persisted document, replacing current state.
    ///
    /// A document naming a subclass that is not in the catalog is rejected.
    pub fn load_document(
        &self,
        character: CharacterId,
        document: SelectionDocument,
    ) -> Result<SubclassProgression, ProgressionError> {
        if let Some(name) = document.subclass.as_deref() {
            self.subclass(name)?;
        }

        let progression = SubclassProgression::from_parts(document.subclass, document.selections);
        self.store.replace(character, progression.clone());
        tracing::debug!(
            %character,
            subclass = ?progression.subclass(),
            selections = progression.selections().len(),
            "Progression loaded from document"
        );
        Ok(progression)
    }

    /// Parse a persisted document of any supported version and restore it.
    pub fn load_document_json(
        &self,
        character: CharacterId,
        text: &str,
    ) -> Result<LoadedDocument, ProgressionError> {
        let loaded = SelectionDocument::from_json(text)?;
        self.load_document(character, loaded.document.clone())?;
        Ok(loaded)
    }

    /// Current-version document for a character, stamped with the current time.
    pub fn export_document(&self, character: CharacterId) -> SelectionDocument {
        let (subclass, selections) = self.store.get_or_default(character).into_parts();
        SelectionDocument::new(subclass, selections, self.clock.now())
    }
}
