//! # Validation Module
//!
//! Query parameter validation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor                                                │
//! │  └── Type validation (integers parse, defaults applied)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── page number >= 0                                                  │
//! │  ├── page size in 1..=100                                              │
//! │  └── sort field / direction (see sort.rs)                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── CHECK (price_cents >= 0), NOT NULL, PRIMARY KEY                   │
//! │                                                                         │
//! │  Nothing reaches the store until layer 2 passes.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::PageRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: i64 = 1;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validates a zero-based page number.
pub fn validate_page_number(page_number: i64) -> ValidationResult<u32> {
    if page_number < 0 {
        return Err(ValidationError::Negative {
            field: "Page number",
            value: page_number,
        });
    }

    u32::try_from(page_number).map_err(|_| ValidationError::OutOfRange {
        field: "Page number",
        min: 0,
        max: i64::from(u32::MAX),
        value: page_number,
    })
}

/// Validates a page size.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_page_size;
///
/// assert_eq!(validate_page_size(20), Ok(20));
/// assert!(validate_page_size(0).is_err());
/// assert!(validate_page_size(101).is_err());
/// ```
pub fn validate_page_size(page_size: i64) -> ValidationResult<u32> {
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ValidationError::OutOfRange {
            field: "Page size",
            min: MIN_PAGE_SIZE,
            max: MAX_PAGE_SIZE,
            value: page_size,
        });
    }

    // Range checked above
    Ok(page_size as u32)
}

/// Validates both paging parameters into a [`PageRequest`].
pub fn validate_page_request(page_number: i64, page_size: i64) -> ValidationResult<PageRequest> {
    let number = validate_page_number(page_number)?;
    let size = validate_page_size(page_size)?;
    Ok(PageRequest::new(number, size))
}

// =============================================================================
// Unit Tests
// =============================================================================
