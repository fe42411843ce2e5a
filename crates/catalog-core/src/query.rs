//! # Query Pipeline
//!
//! Validate → resolve sort → fetch page from store → price each product.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductQuery { category?, sort_by, sort_direction, page_number,       │
//! │                 page_size }                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate()  ── page number, page size, sort field, sort direction     │
//! │       │         (ValidationError here: the store is never touched)     │
//! │       ▼                                                                 │
//! │  ProductStore::find_all / find_by_category (sort + page window)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DiscountEngine::enrich (per row, in store order)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Page<EnrichedProduct> with totals of the filtered set                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline holds no mutable state. Dropping the returned future drops
//! the in-flight store call with it, which is how callers cancel or time out.

use std::sync::Arc;
use tracing::debug;

use crate::discount::DiscountEngine;
use crate::error::CoreResult;
use crate::sort::SortSpec;
use crate::store::ProductStore;
use crate::types::{EnrichedProduct, Page, PageRequest};
use crate::validation::validate_page_request;

/// Default page size when the caller doesn't pick one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

// =============================================================================
// Query Parameters
// =============================================================================

/// Raw, unvalidated query parameters as the transport received them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub sort_by: String,
    pub sort_direction: String,
    pub page_number: i64,
    pub page_size: i64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            category: None,
            sort_by: "SKU".to_string(),
            sort_direction: "ASC".to_string(),
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A query that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub category: Option<String>,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl ProductQuery {
    /// Checks paging first, then sorting; the first violation wins.
    pub fn validate(&self) -> CoreResult<ValidatedQuery> {
        let page = validate_page_request(self.page_number, self.page_size)?;
        let sort = SortSpec::parse(&self.sort_by, &self.sort_direction)?;

        Ok(ValidatedQuery {
            category: self.category.clone(),
            sort,
            page,
        })
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Answers catalog queries against a [`ProductStore`].
///
/// Cheap to clone; both collaborators are shared.
pub struct QueryPipeline<S: ProductStore + ?Sized> {
    store: Arc<S>,
    engine: Arc<DiscountEngine>,
}

impl<S: ProductStore + ?Sized> Clone for QueryPipeline<S> {
    fn clone(&self) -> Self {
        QueryPipeline {
            store: Arc::clone(&self.store),
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S: ProductStore + ?Sized> QueryPipeline<S> {
    pub fn new(store: Arc<S>, engine: Arc<DiscountEngine>) -> Self {
        QueryPipeline { store, engine }
    }

    pub fn engine(&self) -> &DiscountEngine {
        &self.engine
    }

    /// Runs one catalog query.
    ///
    /// ## Errors
    /// - `CoreError::Validation` for bad parameters (store not called)
    /// - `CoreError::Store` when the store fails (not retried)
    pub async fn get_products(&self, query: &ProductQuery) -> CoreResult<Page<EnrichedProduct>> {
        let validated = query.validate()?;

        debug!(
            category = ?validated.category,
            sort = ?validated.sort.orders(),
            page_number = validated.page.number(),
            page_size = validated.page.size(),
            "Querying products"
        );

        let store_page = match &validated.category {
            Some(category) => {
                self.store
                    .find_by_category(category, &validated.sort, validated.page)
                    .await?
            }
            None => self.store.find_all(&validated.sort, validated.page).await?,
        };

        let content = store_page
            .rows
            .into_iter()
            .map(|product| self.engine.enrich(product))
            .collect();

        Ok(Page::new(content, validated.page, store_page.total_elements))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
