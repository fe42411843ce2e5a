//! # Product Store
//!
//! The seam between the query pipeline and storage.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QueryPipeline                                                          │
//! │       │                                                                 │
//! │       │  find_all(sort, page)                                           │
//! │       │  find_by_category(category, sort, page)                         │
//! │       ▼                                                                 │
//! │  ProductStore (trait)                                                   │
//! │  ├── InMemoryProductStore   (this module, tests and demos)             │
//! │  └── ProductRepository      (catalog-db, SQLite)                        │
//! │                                                                         │
//! │  The store filters, sorts and slices. The pipeline never re-sorts     │
//! │  or re-filters what comes back.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::sort::SortSpec;
use crate::types::{category_key, PageRequest, Product};

/// Rows for one page plus the size of the whole filtered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePage {
    pub rows: Vec<Product>,
    pub total_elements: u64,
}

/// Source of raw products.
///
/// Implementations must honour the full [`SortSpec`] (every key, in order)
/// and match categories case-insensitively.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// One page of all products.
    async fn find_all(&self, sort: &SortSpec, page: PageRequest) -> Result<StorePage, StoreError>;

    /// One page of products whose category equals `category`, ignoring case.
    async fn find_by_category(
        &self,
        category: &str,
        sort: &SortSpec,
        page: PageRequest,
    ) -> Result<StorePage, StoreError>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// A [`ProductStore`] over a map keyed by SKU.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<String, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-loaded with products.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|p| (p.sku().as_str().to_string(), p))
            .collect();
        InMemoryProductStore {
            products: RwLock::new(products),
        }
    }

    /// Inserts or replaces a product by SKU.
    pub async fn save(&self, product: Product) {
        let mut products = self.products.write().await;
        products.insert(product.sku().as_str().to_string(), product);
    }

    async fn query<F>(&self, keep: F, sort: &SortSpec, page: PageRequest) -> StorePage
    where
        F: Fn(&Product) -> bool,
    {
        let products = self.products.read().await;
        let mut matching: Vec<&Product> = products.values().filter(|p| keep(*p)).collect();
        matching.sort_by(|a, b| sort.compare(a, b));

        let total_elements = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let rows = matching
            .into_iter()
            .skip(offset)
            .take(page.size() as usize)
            .cloned()
            .collect();

        StorePage {
            rows,
            total_elements,
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_all(&self, sort: &SortSpec, page: PageRequest) -> Result<StorePage, StoreError> {
        Ok(self.query(|_| true, sort, page).await)
    }

    async fn find_by_category(
        &self,
        category: &str,
        sort: &SortSpec,
        page: PageRequest,
    ) -> Result<StorePage, StoreError> {
        let key = category_key(category);
        Ok(self.query(|p| p.category().key() == key, sort, page).await)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortDirection, SortField};
    use crate::validation::validate_page_request;

    fn store() -> InMemoryProductStore {
        InMemoryProductStore::with_products([
            Product::from_parts("ELEC-002", 14999, "Laptop", "Electronics").unwrap(),
            Product::from_parts("ELEC-001", 9999, "Smart TV", "Electronics").unwrap(),
            Product::from_parts("HOME-001", 5000, "Blender", "Home & Kitchen").unwrap(),
            Product::from_parts("CLOTH-001", 2500, "T-Shirt", "Clothing").unwrap(),
        ])
    }

    #[tokio::test]
    async fn test_find_all_sorted_and_counted() {
        let page = store()
            .find_all(&SortSpec::default(), validate_page_request(0, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 4);
        let skus: Vec<_> = page.rows.iter().map(|p| p.sku().as_str()).collect();
        assert_eq!(skus, vec!["CLOTH-001", "ELEC-001", "ELEC-002", "HOME-001"]);
    }

    #[tokio::test]
    async fn test_find_by_category_ignores_case() {
        let page = store()
            .find_by_category(
                "eLeCtRoNiCs",
                &SortSpec::resolve(SortField::Price, SortDirection::Desc),
                validate_page_request(0, 10).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(page.total_elements, 2);
        assert_eq!(page.rows[0].sku().as_str(), "ELEC-002");
        assert_eq!(page.rows[1].sku().as_str(), "ELEC-001");
    }

    #[tokio::test]
    async fn test_page_window_past_end_is_empty() {
        let page = store()
            .find_all(&SortSpec::default(), validate_page_request(5, 10).unwrap())
            .await
            .unwrap();

        assert!(page.rows.is_empty());
        assert_eq!(page.total_elements, 4);
    }

    #[tokio::test]
    async fn test_save_replaces_by_sku() {
        let store = store();
        store
            .save(Product::from_parts("CLOTH-001", 1000, "Socks", "Clothing").unwrap())
            .await;

        let page = store
            .find_by_category("Clothing", &SortSpec::default(), validate_page_request(0, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.rows[0].description(), "Socks");
    }
}
