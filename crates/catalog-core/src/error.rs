//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - What a catalog query can fail with             │
//! │  ├── ValidationError  - Caller mistakes (bad page, sort, amount)       │
//! │  ├── ConfigError      - Broken discount rule set (startup only)        │
//! │  └── StoreError       - Product store infrastructure failure           │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── DbError          - Database failures, converted to StoreError     │
//! │                                                                         │
//! │  catalog-api errors (in app)                                           │
//! │  └── ApiError         - Status code + JSON body                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError (400)                    │
//! │        DbError → StoreError → CoreError → ApiError (500)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending value in error messages
//! 3. Errors are enum variants, never String
//! 4. Each category is a distinct type so the transport can pick a status

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Everything a catalog operation can fail with.
///
/// The three variants are the three categories the transport layer
/// distinguishes: caller error, configuration error, infrastructure error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller supplied an invalid argument. Never retried.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The discount rule set could not be loaded.
    #[error("Invalid discount configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// The product store failed.
    #[error("Product store failure: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// True when the caller can fix the request (maps to 400).
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors (the "invalid argument" category).
///
/// These occur when request parameters or domain values don't meet
/// requirements. Raised before any store call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} cannot be blank")]
    Blank { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Value must not be negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    /// Monetary amount is negative or not representable.
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: String },

    /// Discount percentage outside 0..=100.
    #[error("Invalid percentage: {percent}. Must be between 0 and 100")]
    InvalidPercentage { percent: i64 },

    /// Sort field is not one of the recognised fields.
    #[error("Invalid sort field: {value}. Must be one of: {allowed}")]
    InvalidSortField { value: String, allowed: String },

    /// Sort direction is neither ASC nor DESC.
    #[error("Invalid sort direction: {value}. Must be ASC or DESC")]
    InvalidSortDirection { value: String },
}

// =============================================================================
// Configuration Error
// =============================================================================

/// Discount rule set errors.
///
/// Raised while compiling the rule set at startup. A process holding one of
/// these must not serve requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// SKU pattern does not compile as a regular expression.
    #[error("rule '{rule}': invalid SKU pattern '{pattern}': {reason}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        reason: String,
    },

    /// Percentage outside 0..=100.
    #[error("rule '{rule}': percentage {percentage} is outside 0..=100")]
    PercentageOutOfRange { rule: String, percentage: i64 },

    /// Condition is empty.
    #[error("rule '{rule}': condition cannot be blank")]
    BlankCondition { rule: String },
}

// =============================================================================
// Store Error
// =============================================================================

/// Infrastructure failure reported by a [`ProductStore`](crate::store::ProductStore).
///
/// Opaque on purpose: storage crates convert their own error types into this
/// so catalog-core never depends on them.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl StoreError {
    /// Creates a store error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        StoreError {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error wrapping an underlying cause.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the message without the source chain.
    pub fn message(&self) -> &str {
        &self.message
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "Page size",
            min: 1,
            max: 100,
            value: 101,
        };
        assert_eq!(err.to_string(), "Page size must be between 1 and 100, got 101");

        let err = ValidationError::InvalidSortDirection {
            value: "UP".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid sort direction: UP. Must be ASC or DESC");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::Blank { field: "SKU" }.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(core_err.is_client_error());
        assert_eq!(core_err.to_string(), "SKU cannot be blank");
    }

    #[test]
    fn test_store_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = StoreError::with_source("query failed", io);
        assert_eq!(err.message(), "query failed");
        assert!(err.source().is_some());

        let core_err: CoreError = err.into();
        assert!(!core_err.is_client_error());
    }

    #[test]
    fn test_config_error_names_rule() {
        let err = ConfigError::PercentageOutOfRange {
            rule: "Too generous".to_string(),
            percentage: 150,
        };
        assert_eq!(
            err.to_string(),
            "rule 'Too generous': percentage 150 is outside 0..=100"
        );
    }
}
