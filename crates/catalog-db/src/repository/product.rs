//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Filtered, sorted, paged reads (the [`ProductStore`] implementation)
//! - Inserts used by the seed binary
//! - Lookup by SKU and counting
//!
//! ## Page Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  find_by_category("electronics", PRICE DESC, SKU ASC, page 1 × 20)     │
//! │       │                                                                 │
//! │       ▼  one read transaction                                           │
//! │  SELECT COUNT(*) FROM products WHERE category_key = ?                  │
//! │  SELECT ... FROM products WHERE category_key = ?                       │
//! │     ORDER BY price_cents DESC, sku ASC                                 │
//! │     LIMIT ? OFFSET ?                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRow ──TryFrom──► Product   (corrupt row → DbError::Decode)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ORDER BY is assembled only from [`SortField`] and [`SortDirection`]
//! variants, never from request text. Placeholders are positional `?`
//! throughout; sqlx numbers bare `?` independently of `?N`, so the two
//! styles must not be mixed in one statement.
//!
//! `category_key` is written from [`category_key`] on every insert and the
//! filter binds the same fold of the requested category, so SQLite agrees
//! with the discount engine on non-ASCII names.

use async_trait::async_trait;
use catalog_core::sort::SortOrder;
use catalog_core::{
    category_key, PageRequest, Product, ProductStore, SortDirection, SortField, SortSpec,
    StoreError, StorePage,
};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = "SELECT sku, price_cents, description, category FROM products";

/// A raw `products` row.
#[derive(Debug, Clone, FromRow)]
struct ProductRow {
    sku: String,
    price_cents: i64,
    description: String,
    category: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let sku = row.sku.clone();
        Product::from_parts(row.sku, row.price_cents, row.description, row.category)
            .map_err(|source| DbError::Decode { sku, source })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// repo.insert(&product).await?;
/// let page = repo.find_all(&SortSpec::default(), page_request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Reads one page plus the total, optionally filtered by category.
    ///
    /// Both statements run in the same transaction so the total always
    /// describes the snapshot the rows came from.
    pub async fn page(
        &self,
        category: Option<&str>,
        sort: &SortSpec,
        page: PageRequest,
    ) -> DbResult<StorePage> {
        let key = category.map(category_key);
        let filter = if key.is_some() {
            " WHERE category_key = ?"
        } else {
            ""
        };
        let count_sql = format!("SELECT COUNT(*) FROM products{filter}");
        let page_sql = format!(
            "{SELECT_COLUMNS}{filter} ORDER BY {} LIMIT ? OFFSET ?",
            order_by_clause(sort)
        );

        debug!(
            category = ?category,
            order_by = %order_by_clause(sort),
            page = page.number(),
            size = page.size(),
            "Querying product page"
        );

        let mut tx = self.pool.begin().await?;

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(key) = &key {
            count_query = count_query.bind(key.as_str());
        }
        let total: i64 = count_query.fetch_one(&mut *tx).await?;

        let mut page_query = sqlx::query_as::<_, ProductRow>(&page_sql);
        if let Some(key) = &key {
            page_query = page_query.bind(key.as_str());
        }
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = page_query
            .bind(i64::from(page.size()))
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let rows = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<DbResult<Vec<_>>>()
            .inspect_err(|e| warn!(error = %e, "Rejected stored product row"))?;

        debug!(count = rows.len(), total, "Product page loaded");

        Ok(StorePage {
            rows,
            total_elements: u64::try_from(total).unwrap_or(0),
        })
    }

    /// Gets a product by its exact SKU.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_COLUMNS} WHERE sku = ?"))
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku(), "Inserting product");

        sqlx::query(
            "INSERT INTO products (sku, price_cents, description, category, category_key) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product.sku().as_str())
        .bind(product.price().cents())
        .bind(product.description())
        .bind(product.category().as_str())
        .bind(product.category().key())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("sku", product.sku().as_str()),
            other => other,
        })?;

        Ok(())
    }

    /// Inserts or replaces many products in one transaction.
    ///
    /// Returns the number of rows written.
    pub async fn upsert_many(&self, products: &[Product]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for product in products {
            let result = sqlx::query(
                r#"
                INSERT INTO products (sku, price_cents, description, category, category_key)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(sku) DO UPDATE SET
                    price_cents = excluded.price_cents,
                    description = excluded.description,
                    category = excluded.category,
                    category_key = excluded.category_key
                "#,
            )
            .bind(product.sku().as_str())
            .bind(product.price().cents())
            .bind(product.description())
            .bind(product.category().as_str())
            .bind(product.category().key())
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        debug!(written, "Upserted products");
        Ok(written)
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_all(&self, sort: &SortSpec, page: PageRequest) -> Result<StorePage, StoreError> {
        Ok(self.page(None, sort, page).await?)
    }

    async fn find_by_category(
        &self,
        category: &str,
        sort: &SortSpec,
        page: PageRequest,
    ) -> Result<StorePage, StoreError> {
        Ok(self.page(Some(category), sort, page).await?)
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

fn column(field: SortField) -> &'static str {
    match field {
        SortField::Sku => "sku",
        SortField::Price => "price_cents",
        SortField::Description => "description",
        SortField::Category => "category",
    }
}

fn keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

fn order_by_clause(sort: &SortSpec) -> String {
    sort.orders()
        .iter()
        .map(|SortOrder { field, direction }| format!("{} {}", column(*field), keyword(*direction)))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::validation::validate_page_request;

    async fn seeded() -> (Database, ProductRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        repo.upsert_many(&[
            Product::from_parts("ELEC-002", 14999, "Laptop", "Electronics").unwrap(),
            Product::from_parts("ELEC-001", 9999, "Smart TV", "Electronics").unwrap(),
            Product::from_parts("ELEC-003", 9999, "Monitor", "electronics").unwrap(),
            Product::from_parts("HOME-001", 5000, "Blender", "Home & Kitchen").unwrap(),
            Product::from_parts("CLOTH-005", 2500, "T-Shirt", "Clothing").unwrap(),
        ])
        .await
        .unwrap();
        (db, repo)
    }

    fn skus(page: &StorePage) -> Vec<&str> {
        page.rows.iter().map(|p| p.sku().as_str()).collect()
    }

    #[test]
    fn test_order_by_clause() {
        let spec = SortSpec::resolve(SortField::Price, SortDirection::Desc);
        assert_eq!(order_by_clause(&spec), "price_cents DESC, sku ASC");
        assert_eq!(order_by_clause(&SortSpec::default()), "sku ASC");
    }

    #[tokio::test]
    async fn test_find_all_default_sort() {
        let (_db, repo) = seeded().await;

        let page = repo
            .find_all(&SortSpec::default(), validate_page_request(0, 20).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 5);
        assert_eq!(
            skus(&page),
            vec!["CLOTH-005", "ELEC-001", "ELEC-002", "ELEC-003", "HOME-001"]
        );
    }

    #[tokio::test]
    async fn test_price_ties_broken_by_sku() {
        let (_db, repo) = seeded().await;

        let page = repo
            .find_all(
                &SortSpec::resolve(SortField::Price, SortDirection::Desc),
                validate_page_request(0, 20).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            skus(&page),
            vec!["ELEC-002", "ELEC-001", "ELEC-003", "HOME-001", "CLOTH-005"]
        );
    }

    #[tokio::test]
    async fn test_category_filter_ignores_case() {
        let (_db, repo) = seeded().await;

        let page = repo
            .find_by_category(
                "ELECTRONICS",
                &SortSpec::default(),
                validate_page_request(0, 20).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(skus(&page), vec!["ELEC-001", "ELEC-002", "ELEC-003"]);
    }

    #[tokio::test]
    async fn test_filtered_page_binds_limit_and_offset() {
        let (_db, repo) = seeded().await;

        let page = repo
            .find_by_category(
                "electronics",
                &SortSpec::resolve(SortField::Price, SortDirection::Desc),
                validate_page_request(1, 2).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(skus(&page), vec!["ELEC-003"]);
    }

    #[tokio::test]
    async fn test_category_filter_folds_non_ascii_like_memory_store() {
        let products = vec![
            Product::from_parts("FR-001", 4999, "Casque", "électronique").unwrap(),
            Product::from_parts("FR-002", 1999, "Câble", "Électronique").unwrap(),
            Product::from_parts("FR-003", 999, "Tasse", "Cuisine").unwrap(),
        ];
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        repo.upsert_many(&products).await.unwrap();
        let memory = catalog_core::store::InMemoryProductStore::with_products(products);

        let sort = SortSpec::default();
        let page = validate_page_request(0, 20).unwrap();
        let from_sqlite = repo.find_by_category("ÉLECTRONIQUE", &sort, page).await.unwrap();
        let from_memory = memory.find_by_category("ÉLECTRONIQUE", &sort, page).await.unwrap();

        assert_eq!(from_sqlite.total_elements, 2);
        assert_eq!(from_sqlite.total_elements, from_memory.total_elements);
        assert_eq!(skus(&from_sqlite), skus(&from_memory));
    }

    #[tokio::test]
    async fn test_unknown_category_is_empty() {
        let (_db, repo) = seeded().await;

        let page = repo
            .find_by_category("Toys", &SortSpec::default(), validate_page_request(0, 20).unwrap())
            .await
            .unwrap();

        assert!(page.rows.is_empty());
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn test_paging_window() {
        let (_db, repo) = seeded().await;
        let sort = SortSpec::default();

        let second = repo
            .find_all(&sort, validate_page_request(1, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(second.total_elements, 5);
        assert_eq!(skus(&second), vec!["ELEC-002", "ELEC-003"]);

        let past_end = repo
            .find_all(&sort, validate_page_request(9, 2).unwrap())
            .await
            .unwrap();
        assert!(past_end.rows.is_empty());
        assert_eq!(past_end.total_elements, 5);
    }

    #[tokio::test]
    async fn test_insert_duplicate_sku() {
        let (_db, repo) = seeded().await;

        let err = repo
            .insert(&Product::from_parts("ELEC-001", 100, "Copy", "Electronics").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::UniqueViolation { ref value, .. } if value == "ELEC-001"
        ));
    }

    #[tokio::test]
    async fn test_get_by_sku_and_count() {
        let (_db, repo) = seeded().await;

        let product = repo.get_by_sku("HOME-001").await.unwrap().unwrap();
        assert_eq!(product.price().cents(), 5000);
        assert_eq!(product.category().as_str(), "Home & Kitchen");

        assert!(repo.get_by_sku("home-001").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let (_db, repo) = seeded().await;

        repo.upsert_many(&[Product::from_parts("HOME-001", 4500, "Blender Pro", "Home & Kitchen").unwrap()])
            .await
            .unwrap();

        let product = repo.get_by_sku("HOME-001").await.unwrap().unwrap();
        assert_eq!(product.description(), "Blender Pro");
        assert_eq!(repo.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_corrupt_row_surfaces_as_store_error() {
        let (db, repo) = seeded().await;

        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO products VALUES ('BAD-001', -5, 'Broken', 'Electronics', 'electronics')")
            .execute(db.pool())
            .await
            .unwrap();

        let err = repo
            .find_all(&SortSpec::default(), validate_page_request(0, 20).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "product store query failed");
    }
}
