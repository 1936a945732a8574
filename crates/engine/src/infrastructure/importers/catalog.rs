//! Subclass catalog importer.
//!
//! Reads the authoring format, migrates legacy free-text options into
//! explicit nested options, validates each subclass through the domain
//! constructors and produces the immutable in-memory [`Catalog`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use grimoire_domain::{Choice, DomainError, Feature, LevelBlock, NestedOption, Subclass};

use super::catalog_types::{
    CatalogFile, RawChoice, RawFeature, RawLevelBlock, RawNestedOption, RawSubclass,
};
use super::choice_text::{extract_nested_choices, has_choice_marker, split_choice_options};
use crate::infrastructure::ports::CatalogSource;

/// Errors that can occur while importing a catalog.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalog file not found: {0}")]
    CatalogNotFound(PathBuf),
    #[error("{0}")]
    Malformed(#[from] DomainError),
}

/// A subclass that was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefusedSubclass {
    pub name: String,
    pub reason: DomainError,
}

/// Immutable table of subclasses keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    subclasses: BTreeMap<String, Arc<Subclass>>,
    refused: Vec<RefusedSubclass>,
}

impl Catalog {
    /// Build a catalog from already validated subclasses.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedCatalogEntry` if two subclasses share a name.
    pub fn from_subclasses(
        subclasses: impl IntoIterator<Item = Subclass>,
    ) -> Result<Self, DomainError> {
        let mut catalog = Self::default();
        for subclass in subclasses {
            catalog.register(subclass)?;
        }
        Ok(catalog)
    }

    fn register(&mut self, subclass: Subclass) -> Result<(), DomainError> {
        if self.subclasses.contains_key(subclass.name()) {
            return Err(DomainError::malformed(
                subclass.name(),
                "subclass name is already defined earlier in the catalog",
            ));
        }
        self.subclasses
            .insert(subclass.name().to_string(), Arc::new(subclass));
        Ok(())
    }

    /// Look up a subclass by its exact name.
    pub fn get(&self, name: &str) -> Option<Arc<Subclass>> {
        self.subclasses.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.subclasses.contains_key(name)
    }

    /// Subclass names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subclasses.keys().map(String::as_str)
    }

    /// Subclasses in name order.
    pub fn subclasses(&self) -> impl Iterator<Item = &Arc<Subclass>> {
        self.subclasses.values()
    }

    pub fn len(&self) -> usize {
        self.subclasses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subclasses.is_empty()
    }

    /// Entries skipped during import, in file order.
    pub fn refused(&self) -> &[RefusedSubclass] {
        &self.refused
    }
}

/// Importer for subclass catalog files.
#[derive(Debug, Clone, Default)]
pub struct CatalogImporter {
    strict: bool,
}

impl CatalogImporter {
    /// Importer that skips malformed subclasses and keeps the rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// When strict, the first malformed subclass aborts the import.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read and import the catalog behind `source`.
    pub async fn import(&self, source: &dyn CatalogSource) -> Result<Catalog, ImportError> {
        let text = source.read_catalog().await?;
        tracing::debug!(source = %source.describe(), bytes = text.len(), "Read catalog text");
        self.import_str(&text)
    }

    /// Import a catalog from its JSON text.
    pub fn import_str(&self, text: &str) -> Result<Catalog, ImportError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        let mut catalog = Catalog::default();

        for raw in file.into_subclasses() {
            let name = raw
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or("<unnamed>")
                .to_string();

            let result = self
                .convert_subclass(raw)
                .and_then(|subclass| catalog.register(subclass));

            if let Err(reason) = result {
                if self.strict {
                    return Err(ImportError::Malformed(reason));
                }
                tracing::error!(
                    subclass = %name,
                    error = %reason,
                    "Refusing malformed subclass; it will not be available"
                );
                catalog.refused.push(RefusedSubclass { name, reason });
            }
        }

        tracing::info!(
            loaded = catalog.len(),
            refused = catalog.refused.len(),
            "Subclass catalog imported"
        );

        Ok(catalog)
    }

    fn convert_subclass(&self, raw: RawSubclass) -> Result<Subclass, DomainError> {
        let name = raw.name.unwrap_or_default();
        let levels = raw
            .levels
            .into_iter()
            .map(|block| self.convert_level(&name, block))
            .collect::<Result<Vec<_>, _>>()?;

        Subclass::new(name, raw.description.unwrap_or_default(), levels)
    }

    fn convert_level(&self, subclass: &str, raw: RawLevelBlock) -> Result<LevelBlock, DomainError> {
        let level = u8::try_from(raw.level).map_err(|_| {
            DomainError::malformed(subclass, format!("level {} is out of range", raw.level))
        })?;

        let mut block = LevelBlock::new(level);

        for choice in raw.choices {
            block = block.with_choice(self.convert_choice(subclass, level, choice));
        }

        for feature in raw.features {
            let (feature, inline_choices) = self.convert_feature(subclass, level, feature);
            block = block.with_feature(feature);
            for choice in inline_choices {
                if block.choice(&choice.name).is_some() {
                    tracing::warn!(
                        subclass,
                        level,
                        choice = %choice.name,
                        "Inline option duplicates a declared choice; keeping the declared one"
                    );
                    continue;
                }
                block = block.with_choice(choice);
            }
        }

        Ok(block)
    }

    /// Convert a choice, deriving nested options from its text when none are declared.
    fn convert_choice(&self, subclass: &str, level: u8, raw: RawChoice) -> Choice {
        let name = raw.name.unwrap_or_default();
        let description = raw.description.unwrap_or_default();
        let requirements = raw.requirements;

        if !raw.nested_choices.is_empty() {
            let nested = raw
                .nested_choices
                .into_iter()
                .map(convert_nested_option)
                .collect();
            return Choice::new(name, description)
                .with_nested_choices(nested)
                .with_requirements(requirements);
        }

        if !has_choice_marker(&description) {
            return Choice::new(name, description).with_requirements(requirements);
        }

        let extracted = extract_nested_choices(&description);
        if let Some(ambiguity) = extracted.ambiguity {
            tracing::warn!(
                subclass,
                level,
                choice = %name,
                ?ambiguity,
                "Choice text could not be split cleanly; review the catalog entry"
            );
        }

        Choice::new(name, extracted.description)
            .with_nested_choices(extracted.options)
            .with_requirements(requirements)
    }

    /// Convert a feature, lifting inline options into choices at the same level.
    fn convert_feature(
        &self,
        subclass: &str,
        level: u8,
        raw: RawFeature,
    ) -> (Feature, Vec<Choice>) {
        let name = raw.name.unwrap_or_default();
        let description = raw.description.unwrap_or_default();

        let Some(inline) = split_choice_options(&description) else {
            return (Feature::new(name, description), Vec::new());
        };

        if let Some(ambiguity) = inline.ambiguity {
            tracing::warn!(
                subclass,
                level,
                feature = %name,
                ?ambiguity,
                "Feature options could not be split cleanly; review the catalog entry"
            );
        }

        let choices = inline
            .options
            .into_iter()
            .map(|option| Choice::new(option.name, option.text))
            .collect();

        let kept_description = if inline.prefix.is_empty() {
            description
        } else {
            inline.prefix
        };

        (Feature::new(name, kept_description), choices)
    }
}

fn convert_nested_option(raw: RawNestedOption) -> NestedOption {
    NestedOption::new(
        raw.name.unwrap_or_default(),
        raw.description.unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCatalogSource;
    use serde_json::json;

    fn import(value: serde_json::Value) -> Catalog {
        CatalogImporter::new()
            .import_str(&value.to_string())
            .expect("catalog imports")
    }

    fn charms() -> serde_json::Value {
        json!({
            "name": "Charms",
            "description": "Masters of quick, precise spellwork.",
            "levels": [
                {
                    "level": 1,
                    "features": [{ "name": "Quick Draw", "description": "Draw your wand as a free action." }],
                    "choices": [
                        { "name": "Lightning Fast Wand", "description": "Cast charms faster than the eye can follow." },
                        { "name": "Protective Enchantments", "description": "Wrap allies in layered shield charms." }
                    ]
                },
                {
                    "level": 6,
                    "choices": [
                        { "name": "Duelist", "description": "Excel in formal duels." },
                        { "name": "Charm Savant", "description": "Charms cost you less effort." }
                    ]
                }
            ]
        })
    }

    #[test]
    fn imports_declared_choices() {
        let catalog = import(json!({ "subclasses": [charms()] }));

        let subclass = catalog.get("Charms").expect("Charms loaded");
        assert_eq!(subclass.level_numbers().collect::<Vec<_>>(), vec![1, 6]);
        let block = subclass.level_block(1).expect("level 1");
        assert_eq!(
            block.choice_names(),
            vec!["Lightning Fast Wand", "Protective Enchantments"]
        );
        assert!(catalog.refused().is_empty());
    }

    #[test]
    fn accepts_bare_array_and_options_alias() {
        let catalog = import(json!([{
            "name": "Divination",
            "description": "Seers.",
            "levels": [{
                "level": 1,
                "choices": [{
                    "name": "Foresight",
                    "description": "Glimpse what comes next.",
                    "options": [
                        { "name": "Dreams", "description": "Visions while asleep." },
                        { "name": "Tea Leaves", "description": "Read the cup." }
                    ]
                }]
            }]
        }]));

        let subclass = catalog.get("Divination").expect("loaded");
        let choice = subclass
            .level_block(1)
            .and_then(|b| b.choice("Foresight"))
            .expect("choice");
        assert_eq!(choice.nested_choices.len(), 2);
    }

    #[test]
    fn migrates_choice_text_into_nested_options() {
        let catalog = import(json!({ "subclasses": [{
            "name": "Transfiguration",
            "description": "Reshapers of matter.",
            "levels": [{
                "level": 1,
                "choices": [{
                    "name": "Elementalist",
                    "description": "You bond with a primal element. Choose: Fire Attunement or Water Attunement"
                }]
            }]
        }]}));

        let subclass = catalog.get("Transfiguration").expect("loaded");
        let choice = subclass
            .level_block(1)
            .and_then(|b| b.choice("Elementalist"))
            .expect("choice");

        assert_eq!(choice.description, "You bond with a primal element.");
        let names: Vec<&str> = choice.nested_choices.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Fire Attunement", "Water Attunement"]);
        assert_eq!(
            choice.nested_choices[0].description,
            "You bond with a primal element. Fire Attunement"
        );
    }

    #[test]
    fn migrated_option_names_drop_parentheticals() {
        let catalog = import(json!({ "subclasses": [{
            "name": "Scholarship",
            "levels": [{
                "level": 1,
                "choices": [{
                    "name": "Skilled",
                    "description": "Pick a skill. Choose: Stealth (with disadvantage) or Arcana"
                }]
            }]
        }]}));

        let subclass = catalog.get("Scholarship").expect("loaded");
        let choice = subclass
            .level_block(1)
            .and_then(|b| b.choice("Skilled"))
            .expect("choice");
        let names: Vec<&str> = choice.nested_choices.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Stealth", "Arcana"]);
        assert_eq!(
            choice.nested_choices[0].description,
            "Pick a skill. Stealth (with disadvantage)"
        );
    }

    #[test]
    fn explicit_options_suppress_text_migration() {
        let catalog = import(json!({ "subclasses": [{
            "name": "Transfiguration",
            "levels": [{
                "level": 1,
                "choices": [{
                    "name": "Elementalist",
                    "description": "Choose: Fire or Water",
                    "nestedChoices": [{ "name": "Earth", "description": "Stone." }]
                }]
            }]
        }]}));

        let subclass = catalog.get("Transfiguration").expect("loaded");
        let choice = subclass
            .level_block(1)
            .and_then(|b| b.choice("Elementalist"))
            .expect("choice");
        assert_eq!(choice.description, "Choose: Fire or Water");
        assert_eq!(choice.nested_choices.len(), 1);
    }

    #[test]
    fn feature_inline_options_become_choices() {
        let catalog = import(json!({ "subclasses": [{
            "name": "Herbology",
            "levels": [{
                "level": 1,
                "features": [{
                    "name": "Green Thumb",
                    "description": "You tend a garden. Choose: Mandrake (loud) or Devil's Snare (dangerous)"
                }]
            }]
        }]}));

        let subclass = catalog.get("Herbology").expect("loaded");
        let block = subclass.level_block(1).expect("level 1");
        assert_eq!(block.features[0].description, "You tend a garden.");
        assert_eq!(block.choice_names(), vec!["Mandrake", "Devil's Snare"]);
        assert_eq!(
            block.choice("Mandrake").map(|c| c.description.as_str()),
            Some("Mandrake (loud)")
        );
    }

    #[test]
    fn malformed_subclass_is_refused_and_others_load() {
        let catalog = import(json!({ "subclasses": [
            charms(),
            {
                "name": "Broken",
                "levels": [{ "level": 1, "choices": [{ "name": "No Description" }] }]
            }
        ]}));

        assert!(catalog.contains("Charms"));
        assert!(!catalog.contains("Broken"));
        assert_eq!(catalog.refused().len(), 1);
        assert_eq!(catalog.refused()[0].name, "Broken");
        assert!(matches!(
            catalog.refused()[0].reason,
            DomainError::MalformedCatalogEntry { .. }
        ));
    }

    #[test]
    fn strict_mode_aborts_on_malformed_subclass() {
        let text = json!({ "subclasses": [
            { "name": "Broken", "levels": [{ "level": 0 }] }
        ]})
        .to_string();

        let result = CatalogImporter::new().with_strict(true).import_str(&text);
        assert!(matches!(result, Err(ImportError::Malformed(_))));
    }

    #[test]
    fn out_of_range_level_is_malformed() {
        let catalog = import(json!({ "subclasses": [
            { "name": "Huge", "levels": [{ "level": 300 }] }
        ]}));
        assert!(catalog.is_empty());
        assert_eq!(catalog.refused().len(), 1);
    }

    #[test]
    fn duplicate_subclass_names_keep_the_first() {
        let mut second = charms();
        second["description"] = json!("A second definition.");

        let catalog = import(json!({ "subclasses": [charms(), second] }));

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("Charms").map(|s| s.description().to_string()),
            Some("Masters of quick, precise spellwork.".to_string())
        );
        assert_eq!(catalog.refused().len(), 1);
    }

    #[test]
    fn names_are_listed_in_order() {
        let catalog = import(json!({ "subclasses": [
            { "name": "Transfiguration" },
            { "name": "Charms" }
        ]}));
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Charms", "Transfiguration"]);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result = CatalogImporter::new().import_str("{ nope");
        assert!(matches!(result, Err(ImportError::Json(_))));
    }

    #[tokio::test]
    async fn imports_through_a_catalog_source() {
        let mut source = MockCatalogSource::new();
        let text = json!({ "subclasses": [charms()] }).to_string();
        source
            .expect_read_catalog()
            .times(1)
            .returning(move || Ok(text.clone()));
        source
            .expect_describe()
            .returning(|| "mock catalog".to_string());

        let catalog = CatalogImporter::new()
            .import(&source)
            .await
            .expect("catalog imports");

        assert!(catalog.contains("Charms"));
    }

    #[tokio::test]
    async fn source_errors_propagate() {
        let mut source = MockCatalogSource::new();
        source
            .expect_read_catalog()
            .returning(|| Err(ImportError::CatalogNotFound(PathBuf::from("missing.json"))));

        let result = CatalogImporter::new().import(&source).await;
        assert!(matches!(result, Err(ImportError::CatalogNotFound(_))));
    }
}
