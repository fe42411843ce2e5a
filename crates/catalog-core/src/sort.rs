//! # Sort Resolution
//!
//! Turns a requested sort field and direction into a total order.
//!
//! ## Tie-Break
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request: sortBy=PRICE, sortDirection=DESC                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SortSpec [ (price, DESC), (sku, ASC) ]                                 │
//! │                                                                         │
//! │  Two products at 19.99 are ordered by SKU ascending, so page 2 never   │
//! │  repeats or skips a row no matter how the store returns ties.          │
//! │                                                                         │
//! │  Request: sortBy=SKU → [ (sku, dir) ]  (SKU is unique, no tie-break)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::Product;

// =============================================================================
// Sort Field
// =============================================================================

/// Fields a catalog query can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Sku,
    Price,
    Description,
    Category,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Sku,
        SortField::Price,
        SortField::Description,
        SortField::Category,
    ];

    /// The external (request) name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::Sku => "SKU",
            SortField::Price => "PRICE",
            SortField::Description => "DESCRIPTION",
            SortField::Category => "CATEGORY",
        }
    }

    /// Compares two products on this field only, ascending.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Sku => a.sku().cmp(b.sku()),
            SortField::Price => a.price().cmp(&b.price()),
            SortField::Description => a.description().cmp(b.description()),
            SortField::Category => a.category().cmp(b.category()),
        }
    }

    fn allowed() -> String {
        SortField::ALL
            .iter()
            .map(SortField::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"PrIcE"` parses as [`SortField::Price`].
impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SKU" => Ok(SortField::Sku),
            "PRICE" => Ok(SortField::Price),
            "DESCRIPTION" => Ok(SortField::Description),
            "CATEGORY" => Ok(SortField::Category),
            _ => Err(ValidationError::InvalidSortField {
                value: s.to_string(),
                allowed: SortField::allowed(),
            }),
        }
    }
}

// =============================================================================
// Sort Direction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Orients an ascending comparison.
    #[inline]
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(ValidationError::InvalidSortDirection {
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Sort Spec
// =============================================================================

/// One key of an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

/// A resolved, total ordering over products.
///
/// Always ends with SKU, which is unique, so no two distinct products
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    orders: Vec<SortOrder>,
}

impl SortSpec {
    /// Resolves a field and direction, appending `SKU ASC` unless the
    /// primary field already is SKU.
    pub fn resolve(field: SortField, direction: SortDirection) -> Self {
        let mut orders = vec![SortOrder { field, direction }];
        if field != SortField::Sku {
            orders.push(SortOrder {
                field: SortField::Sku,
                direction: SortDirection::Asc,
            });
        }
        SortSpec { orders }
    }

    /// Parses raw request values (case-insensitive) and resolves them.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::sort::{SortDirection, SortField, SortSpec};
    ///
    /// let spec = SortSpec::parse("PrIcE", "dEsC").unwrap();
    /// assert_eq!(spec, SortSpec::resolve(SortField::Price, SortDirection::Desc));
    /// assert!(SortSpec::parse("invalid", "ASC").is_err());
    /// ```
    pub fn parse(field: &str, direction: &str) -> Result<Self, ValidationError> {
        let field = field.parse::<SortField>()?;
        let direction = direction.parse::<SortDirection>()?;
        Ok(SortSpec::resolve(field, direction))
    }

    /// The ordered keys, primary first.
    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    pub fn primary(&self) -> SortOrder {
        self.orders[0]
    }

    /// Compares two products under this ordering.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        self.orders
            .iter()
            .map(|order| order.direction.apply(order.field.compare(a, b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::resolve(SortField::Sku, SortDirection::Asc)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
