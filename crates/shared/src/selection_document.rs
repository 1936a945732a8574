//! Versioned persisted form of a character's subclass selections.
//!
//! Only the canonical selection map, the subclass name, the schema version and
//! a save timestamp survive a save/load round trip.
//!
//! # Versions
//!
//! - **1** (or no `version` field): legacy documents. Selections may use any
//!   shape known to [`LegacySelection`](crate::normalize::LegacySelection), and
//!   the document may be a bare `level -> value` map with no wrapper at all.
//! - **2**: `{ "version": 2, "subclass": ..., "selections": {...}, "savedAt": ... }`
//!   with canonical selections only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use grimoire_domain::Selections;

use crate::normalize::normalize_selections;

/// Schema version written by this crate
pub const CURRENT_DOCUMENT_VERSION: u64 = 2;

/// Errors that can occur while reading a selection document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Selection document must be a JSON object")]
    NotAnObject,
    #[error("Unsupported selection document version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// The persisted selection document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDocument {
    pub version: u64,
    pub subclass: Option<String>,
    pub selections: Selections,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// A document read from storage, with what had to be repaired on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub document: SelectionDocument,
    /// Version the document was migrated from, if it was not current
    pub migrated_from: Option<u64>,
    /// Levels whose stored value matched no known shape
    pub unrecognized_levels: Vec<u8>,
}

impl SelectionDocument {
    /// A current-version document.
    pub fn new(subclass: Option<String>, selections: Selections, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_DOCUMENT_VERSION,
            subclass,
            selections,
            saved_at: Some(saved_at),
        }
    }

    /// Build a current-version document from a legacy raw selection map.
    pub fn from_legacy_map(subclass: Option<String>, raw: &Map<String, Value>) -> LoadedDocument {
        let normalized = normalize_selections(raw);
        LoadedDocument {
            document: Self {
                version: CURRENT_DOCUMENT_VERSION,
                subclass,
                selections: normalized.selections,
                saved_at: None,
            },
            migrated_from: Some(1),
            unrecognized_levels: normalized.unrecognized,
        }
    }

    /// Parse a document of any supported version.
    pub fn from_json(text: &str) -> Result<LoadedDocument, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Read a document of any supported version, normalizing its selections.
    pub fn from_value(value: &Value) -> Result<LoadedDocument, DocumentError> {
        let obj = value.as_object().ok_or(DocumentError::NotAnObject)?;

        let version = match obj.get("version") {
            None => 1,
            Some(v) => v.as_u64().ok_or_else(|| DocumentError::InvalidField {
                field: "version",
                reason: format!("expected a positive integer, got {}", v),
            })?,
        };
        if version == 0 || version > CURRENT_DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: version,
                supported: CURRENT_DOCUMENT_VERSION,
            });
        }

        let subclass = match obj.get("subclass") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) if name.trim().is_empty() => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(other) => {
                return Err(DocumentError::InvalidField {
                    field: "subclass",
                    reason: format!("expected a string, got {}", other),
                })
            }
        };

        let empty = Map::new();
        let raw_selections = match obj.get("selections") {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) if version == 1 && !obj.contains_key("subclass") => obj,
            None | Some(Value::Null) => &empty,
            Some(other) => {
                return Err(DocumentError::InvalidField {
                    field: "selections",
                    reason: format!("expected an object, got {}", other),
                })
            }
        };

        let saved_at = match obj.get("savedAt") {
            None | Some(Value::Null) => None,
            Some(v) => Some(serde_json::from_value::<DateTime<Utc>>(v.clone()).map_err(
                |e| DocumentError::InvalidField {
                    field: "savedAt",
                    reason: e.to_string(),
                },
            )?),
        };

        let mut loaded = Self::from_legacy_map(subclass, raw_selections);
        loaded.document.saved_at = saved_at;
        loaded.migrated_from = (version < CURRENT_DOCUMENT_VERSION).then_some(version);

        if let Some(from) = loaded.migrated_from {
            tracing::info!(
                from_version = from,
                to_version = CURRENT_DOCUMENT_VERSION,
                "Migrated legacy selection document"
            );
        }

        Ok(loaded)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
