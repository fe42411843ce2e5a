//! # catalog-core: Pure Business Logic for the Product Catalog
//!
//! This crate is the **heart** of the catalog. It contains the discount
//! engine and the query pipeline with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Product Catalog Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 catalog-api (HTTP, axum)                        │   │
//! │  │    GET /api/products?category=&sortBy=&sortDirection=&...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   query   │  │ discount  │  │   sort    │  │   money   │  │   │
//! │  │   │ Pipeline  │  │  RuleSet  │  │ SortSpec  │  │   Money   │  │   │
//! │  │   │           │  │  Engine   │  │ tie-break │  │ half-up   │  │   │
//! │  │   └─────┬─────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │         │ ProductStore (trait)                                  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────┼───────────────────────────────────────────────────────┘   │
//! │            │                                                            │
//! │  ┌─────────▼───────────────────────────────────────────────────────┐   │
//! │  │                 catalog-db (SQLite repository)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Non-negative Money with half-up discounting
//! - [`types`] - Sku, Category, Product, EnrichedProduct, Page
//! - [`discount`] - Rule set compilation and the discount engine
//! - [`sort`] - Sort field/direction parsing and total ordering
//! - [`store`] - The ProductStore seam and an in-memory store
//! - [`query`] - The query pipeline
//! - [`validation`] - Paging parameter checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use catalog_core::discount::{DiscountEngine, DiscountRuleConfig, RuleKind, RuleSet};
//! use catalog_core::query::{ProductQuery, QueryPipeline};
//! use catalog_core::store::InMemoryProductStore;
//! use catalog_core::Product;
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let rules = RuleSet::compile(&[DiscountRuleConfig::new(
//!     "Electronics Category", RuleKind::Category, "Electronics", 15,
//! )]).unwrap();
//! let store = InMemoryProductStore::with_products([
//!     Product::from_parts("ELEC-001", 1999, "Wireless Mouse", "Electronics").unwrap(),
//! ]);
//! let pipeline = QueryPipeline::new(Arc::new(store), Arc::new(DiscountEngine::new(rules)));
//!
//! let page = pipeline.get_products(&ProductQuery::default()).await.unwrap();
//! assert_eq!(page.content[0].final_price.to_string(), "16.99");
//! # });
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod query;
pub mod sort;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{DiscountEngine, RuleSet};
pub use error::{ConfigError, CoreError, CoreResult, StoreError, ValidationError};
pub use money::Money;
pub use query::{ProductQuery, QueryPipeline};
pub use sort::{SortDirection, SortField, SortSpec};
pub use store::{ProductStore, StorePage};
pub use types::*;
