//! Catalog authoring format.
//!
//! Everything is optional at this layer so that a missing name or description
//! surfaces as a malformed-entry error for that one subclass instead of
//! failing the whole file.

use serde::Deserialize;

/// Top level of a catalog file: either `{ "subclasses": [...] }` or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogFile {
    Wrapped {
        #[serde(default)]
        subclasses: Vec<RawSubclass>,
    },
    Bare(Vec<RawSubclass>),
}

impl CatalogFile {
    pub fn into_subclasses(self) -> Vec<RawSubclass> {
        match self {
            Self::Wrapped { subclasses } | Self::Bare(subclasses) => subclasses,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubclass {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub levels: Vec<RawLevelBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLevelBlock {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub features: Vec<RawFeature>,
    #[serde(default)]
    pub choices: Vec<RawChoice>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChoice {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit nested options; `options` is accepted as an alias
    #[serde(default, alias = "options")]
    pub nested_choices: Vec<RawNestedOption>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNestedOption {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
