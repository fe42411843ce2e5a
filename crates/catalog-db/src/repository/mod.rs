//! # Repository Module
//!
//! SQLite-backed repositories.
//!
//! ```text
//! QueryPipeline ──► dyn ProductStore ──► ProductRepository ──► products table
//!                                         ├── find_all / find_by_category
//!                                         └── insert / upsert_many / get_by_sku / count
//! ```
//!
//! - [`ProductRepository`](product::ProductRepository) - catalog reads and seeding writes

pub mod product;
