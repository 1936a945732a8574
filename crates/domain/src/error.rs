//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A catalog entry is missing required data or breaks a catalog invariant.
    ///
    /// The offending subclass must not be registered.
    #[error("Malformed catalog entry in subclass '{subclass}': {reason}")]
    MalformedCatalogEntry { subclass: String, reason: String },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if level == 0 {
    ///     return Err(DomainError::validation("Character level must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a malformed catalog entry error for the named subclass
    pub fn malformed(subclass: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCatalogEntry {
            subclass: subclass.into(),
            reason: reason.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("level cannot be zero");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: level cannot be zero");
    }

    #[test]
    fn test_malformed_catalog_entry_error() {
        let err = DomainError::malformed("Charms", "choice at level 6 has no name");
        assert!(matches!(err, DomainError::MalformedCatalogEntry { .. }));
        assert_eq!(
            err.to_string(),
            "Malformed catalog entry in subclass 'Charms': choice at level 6 has no name"
        );
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("'sixth' is not a level number");
        assert_eq!(err.to_string(), "Parse error: 'sixth' is not a level number");
    }
}
