//! # Catalog API
//!
//! HTTP transport for the product catalog.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog API Server                               │
//! │                                                                         │
//! │  Client ──► axum (8080) ──► QueryPipeline ──► ProductRepository ──► SQLite
//! │                  │               │                                      │
//! │                  │               └── DiscountEngine (Arc, immutable)   │
//! │                  │                                                      │
//! │                  ├── params → ProductQuery      (routes)               │
//! │                  ├── CoreError → status + JSON  (error)                │
//! │                  └── tokio::time::timeout per query                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

pub use crate::config::AppConfig;
pub use crate::error::ApiError;
pub use crate::routes::{router, AppState};
