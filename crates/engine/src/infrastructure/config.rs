//! Engine configuration from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `GRIMOIRE_CATALOG_PATH` | Catalog JSON file to load | embedded catalog |
//! | `GRIMOIRE_STRICT_CATALOG` | Abort on any malformed subclass | `false` |
//! | `GRIMOIRE_CHARACTER_LEVEL` | Default level for reports | `1` |

use std::path::PathBuf;

use grimoire_domain::CharacterLevel;

pub const CATALOG_PATH_VAR: &str = "GRIMOIRE_CATALOG_PATH";
pub const STRICT_CATALOG_VAR: &str = "GRIMOIRE_STRICT_CATALOG";
pub const CHARACTER_LEVEL_VAR: &str = "GRIMOIRE_CHARACTER_LEVEL";

/// Runtime configuration for the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Catalog file; `None` uses the embedded catalog
    pub catalog_path: Option<PathBuf>,
    /// Abort catalog loading on the first malformed subclass
    pub strict_catalog: bool,
    pub default_level: CharacterLevel,
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup.
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let catalog_path = lookup(CATALOG_PATH_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let strict_catalog = match lookup(STRICT_CATALOG_VAR) {
            None => false,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    var = STRICT_CATALOG_VAR,
                    value = %raw,
                    "Unrecognized boolean, using false"
                );
                false
            }),
        };

        let default_level = match lookup(CHARACTER_LEVEL_VAR) {
            None => CharacterLevel::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    var = CHARACTER_LEVEL_VAR,
                    value = %raw,
                    error = %e,
                    "Invalid character level, using 1"
                );
                CharacterLevel::default()
            }),
        };

        Self {
            catalog_path,
            strict_catalog,
            default_level,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
