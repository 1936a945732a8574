//! Character level value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Highest level a character can reach
pub const MAX_CHARACTER_LEVEL: u8 = 20;

/// A validated character level (1..=20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CharacterLevel(u8);

impl CharacterLevel {
    /// The level every character starts at.
    pub const FIRST: Self = Self(1);

    /// Create a new validated character level.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the level is 0 or above 20.
    pub fn new(level: u8) -> Result<Self, DomainError> {
        if level == 0 {
            return Err(DomainError::validation("Character level must be at least 1"));
        }
        if level > MAX_CHARACTER_LEVEL {
            return Err(DomainError::validation(format!(
                "Character level cannot exceed {}",
                MAX_CHARACTER_LEVEL
            )));
        }
        Ok(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether a block declared at `level` is unlocked at this character level.
    pub fn unlocks(self, level: u8) -> bool {
        level <= self.0
    }
}

impl Default for CharacterLevel {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for CharacterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for CharacterLevel {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<CharacterLevel> for u8 {
    fn from(level: CharacterLevel) -> u8 {
        level.0
    }
}

impl std::str::FromStr for CharacterLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level: u8 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::parse(format!("'{}' is not a character level", s)))?;
        Self::new(level)
    }
}
