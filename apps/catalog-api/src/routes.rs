//! HTTP routes.
//!
//! ```text
//! GET /api/products?category=&sortBy=SKU&sortDirection=ASC&pageNumber=0&pageSize=20
//! GET /health
//! GET /api-docs/openapi.json
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use catalog_core::query::DEFAULT_PAGE_SIZE;
use catalog_core::{
    DiscountEngine, EnrichedProduct, Page, ProductQuery, ProductStore, QueryPipeline,
};
use catalog_db::Database;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::error::{ApiError, ErrorBody};

// =============================================================================
// State
// =============================================================================

/// Shared handler state. Cloned per request; everything inside is shared.
#[derive(Clone)]
pub struct AppState {
    pipeline: QueryPipeline<dyn ProductStore>,
    database: Database,
    query_timeout: Duration,
}

impl AppState {
    /// State backed by the database's own product repository.
    pub fn new(database: Database, engine: Arc<DiscountEngine>, query_timeout: Duration) -> Self {
        let store: Arc<dyn ProductStore> = Arc::new(database.products());
        Self::with_store(store, database, engine, query_timeout)
    }

    /// State with a separate product store; the database only answers health checks.
    pub fn with_store(
        store: Arc<dyn ProductStore>,
        database: Database,
        engine: Arc<DiscountEngine>,
        query_timeout: Duration,
    ) -> Self {
        AppState {
            pipeline: QueryPipeline::new(store, engine),
            database,
            query_timeout,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
}

// =============================================================================
// OpenAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(title = "Product Catalog API", description = "Discounted, paged product listings"),
    paths(list_products, health),
    components(schemas(ProductPageResponse, ProductResponse, HealthResponse, ErrorBody))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// =============================================================================
// GET /api/products
// =============================================================================

/// Query string of `GET /api/products`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductsParams {
    /// Exact category, case-insensitive
    #[serde(default)]
    pub category: Option<String>,
    /// SKU, PRICE, DESCRIPTION or CATEGORY
    #[serde(default = "default_sort_by")]
    #[param(default = "SKU")]
    pub sort_by: String,
    /// ASC or DESC
    #[serde(default = "default_sort_direction")]
    #[param(default = "ASC")]
    pub sort_direction: String,
    /// Zero-based
    #[serde(default)]
    #[param(minimum = 0)]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100, default = 20)]
    pub page_size: i64,
}

fn default_sort_by() -> String {
    "SKU".to_string()
}

fn default_sort_direction() -> String {
    "ASC".to_string()
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl From<ProductsParams> for ProductQuery {
    fn from(params: ProductsParams) -> Self {
        ProductQuery {
            category: params.category,
            sort_by: params.sort_by,
            sort_direction: params.sort_direction,
            page_number: params.page_number,
            page_size: params.page_size,
        }
    }
}

/// One product in the response, prices as decimal strings with two places.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub sku: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub discount: u8,
    pub final_price: Decimal,
}

impl From<EnrichedProduct> for ProductResponse {
    fn from(enriched: EnrichedProduct) -> Self {
        let product = enriched.product;
        ProductResponse {
            sku: product.sku().as_str().to_string(),
            description: product.description().to_string(),
            category: product.category().as_str().to_string(),
            price: product.price().to_decimal(),
            discount: enriched.discount_percent,
            final_price: enriched.final_price.to_decimal(),
        }
    }
}

/// Response body of `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageResponse {
    pub content: Vec<ProductResponse>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<EnrichedProduct>> for ProductPageResponse {
    fn from(page: Page<EnrichedProduct>) -> Self {
        let page = page.map(ProductResponse::from);
        ProductPageResponse {
            content: page.content,
            page_number: page.page_number,
            page_size: page.page_size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

/// Lists products with their discounts, filtered, sorted and paged.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductsParams),
    responses(
        (status = 200, description = "One page of discounted products", body = ProductPageResponse),
        (status = 400, description = "Invalid paging or sort parameter", body = ErrorBody),
        (status = 500, description = "Store or configuration failure", body = ErrorBody),
        (status = 504, description = "Query exceeded the configured timeout", body = ErrorBody)
    )
)]
async fn list_products(
    State(state): State<AppState>,
    uri: Uri,
    params: Result<Query<ProductsParams>, QueryRejection>,
) -> Result<Json<ProductPageResponse>, ApiError> {
    let path = uri.path();
    let Query(params) = params.map_err(|rejection| ApiError::bad_request(rejection.body_text(), path))?;
    let query = ProductQuery::from(params);

    debug!(?query, "GET /api/products");
    let started = Instant::now();

    let page = tokio::time::timeout(state.query_timeout, state.pipeline.get_products(&query))
        .await
        .map_err(|_| ApiError::timeout(state.query_timeout, path))?
        .map_err(|e| ApiError::from_core(e, path))?;

    info!(
        category = ?query.category,
        count = page.content.len(),
        total = page.total_elements,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Products page served"
    );

    Ok(Json(ProductPageResponse::from(page)))
}

// =============================================================================
// GET /health
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub discount_rules: usize,
    pub checked_at: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = HealthResponse)
    )
)]
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ready = state.database.health_check().await;

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        database: if ready { "ready" } else { "unavailable" },
        discount_rules: state.pipeline.engine().rules().len(),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

// =============================================================================
// Unit Tests
// =============================================================================
