//! # Domain Types
//!
//! Core domain types used throughout the catalog.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ EnrichedProduct │   │    Page<T>      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku (Sku)      │──►│  product        │──►│  content        │       │
//! │  │  price (Money)  │   │  discount %     │   │  page_number    │       │
//! │  │  description    │   │  final_price    │   │  total_elements │       │
//! │  │  category       │   └─────────────────┘   │  total_pages    │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  Sku, Category: non-blank newtypes validated at construction           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are immutable. Between requests they are re-fetched from the
//! store, never updated in place.

use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Stock Keeping Unit - unique, non-blank business identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Creates a SKU, rejecting blank values.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::Sku;
    ///
    /// assert!(Sku::new("ELEC-001").is_ok());
    /// assert!(Sku::new("   ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Blank { field: "SKU" });
        }
        Ok(Sku(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product category label, non-blank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Creates a category, rejecting blank values.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Blank { field: "Category" });
        }
        Ok(Category(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for every category comparison.
    pub fn key(&self) -> String {
        category_key(&self.0)
    }

    /// Case-insensitive exact comparison (no substring matching).
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.key() == category_key(other)
    }
}

/// Folds a category name for comparison. Unicode-aware, so "ÉLECTRONIQUE"
/// and "électronique" share a key.
///
/// Stores persist or compute this key so that filtering agrees with rule
/// matching.
pub fn category_key(category: &str) -> String {
    category.to_lowercase()
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    sku: Sku,
    price: Money,
    description: String,
    category: Category,
}

impl Product {
    /// Assembles a product from already validated parts.
    pub fn new(sku: Sku, price: Money, description: impl Into<String>, category: Category) -> Self {
        Product {
            sku,
            price,
            description: description.into(),
            category,
        }
    }

    /// Builds a product from raw storage values, validating every invariant.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::Product;
    ///
    /// let p = Product::from_parts("ELEC-001", 1999, "Wireless Mouse", "Electronics").unwrap();
    /// assert_eq!(p.price().to_string(), "19.99");
    /// assert!(Product::from_parts("ELEC-001", -1, "Broken", "Electronics").is_err());
    /// ```
    pub fn from_parts(
        sku: impl Into<String>,
        price_cents: i64,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Product::new(
            Sku::new(sku)?,
            Money::from_cents(price_cents)?,
            description,
            Category::new(category)?,
        ))
    }

    #[inline]
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn category(&self) -> &Category {
        &self.category
    }
}

// =============================================================================
// Enriched Product
// =============================================================================

/// A product plus the discount computed for it on this request.
///
/// Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedProduct {
    pub product: Product,
    /// Highest applicable discount percentage, 0 when no rule applies.
    pub discount_percent: u8,
    /// `product.price` with the discount applied, scale 2.
    pub final_price: Money,
}

// =============================================================================
// Paging
// =============================================================================

/// A validated page window: zero-based page number and page size.
///
/// Construct through [`validation::validate_page_request`](crate::validation::validate_page_request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    pub(crate) fn new(number: u32, size: u32) -> Self {
        PageRequest { number, size }
    }

    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip.
    #[inline]
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

/// One page of results plus the totals for the whole (filtered) result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a page; `total_pages = ceil(total_elements / page_size)`.
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size());
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };

        Page {
            content,
            page_number: request.number(),
            page_size: request.size(),
            total_elements,
            total_pages,
        }
    }

    /// Transforms the content, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identifiers_rejected() {
        assert_eq!(Sku::new(""), Err(ValidationError::Blank { field: "SKU" }));
        assert_eq!(
            Category::new(" \t"),
            Err(ValidationError::Blank { field: "Category" })
        );
    }

    #[test]
    fn test_category_matches_ignore_case() {
        let category = Category::new("Home & Kitchen").unwrap();
        assert!(category.matches_ignore_case("home & kitchen"));
        assert!(category.matches_ignore_case("HOME & KITCHEN"));
        assert!(!category.matches_ignore_case("Home"));
    }

    #[test]
    fn test_category_key_folds_non_ascii() {
        let category = Category::new("Électronique").unwrap();
        assert_eq!(category.key(), "électronique");
        assert!(category.matches_ignore_case("ÉLECTRONIQUE"));
        assert_eq!(category_key("ÉLECTRONIQUE"), category.key());
    }

    #[test]
    fn test_product_from_parts() {
        let product = Product::from_parts("SKU0001", 1999, "Wireless Mouse", "Electronics").unwrap();
        assert_eq!(product.sku().as_str(), "SKU0001");
        assert_eq!(product.price().cents(), 1999);
        assert_eq!(product.description(), "Wireless Mouse");
        assert_eq!(product.category().as_str(), "Electronics");
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(0, 10);
        assert_eq!(Page::<()>::new(vec![], request, 0).total_pages, 0);
        assert_eq!(Page::<()>::new(vec![], request, 10).total_pages, 1);
        assert_eq!(Page::<()>::new(vec![], request, 11).total_pages, 2);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(PageRequest::new(3, 20).offset(), 60);
        assert_eq!(PageRequest::new(u32::MAX, 100).offset(), u64::from(u32::MAX) * 100);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2), 5);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20]);
        assert_eq!(mapped.page_number, 1);
        assert_eq!(mapped.total_pages, 3);
    }
}
