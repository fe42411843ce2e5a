//! # Seed Data Generator
//!
//! Populates the catalog database with sample products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount into a specific file
//! cargo run -p catalog-db --bin seed -- --count 1000 --db ./data/catalog.db
//! ```
//!
//! ## Generated Products
//! SKUs follow `{PREFIX}-{NNN}`, so roughly one in ten ends in `5` and
//! picks up the SKU-suffix discount from the sample rule set. Prices are
//! deterministic per index, between 5.00 and 504.99.

use anyhow::Context;
use catalog_core::Product;
use catalog_db::{Database, DbConfig, DEFAULT_DATABASE_PATH};
use std::env;
use tracing_subscriber::EnvFilter;

/// (SKU prefix, category, product names)
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "ELEC",
        "Electronics",
        &[
            "Wireless Mouse",
            "Mechanical Keyboard",
            "USB-C Hub",
            "Noise Cancelling Headphones",
            "Smart TV",
            "Laptop Stand",
            "Portable Speaker",
            "Webcam",
        ],
    ),
    (
        "HOME",
        "Home & Kitchen",
        &[
            "Blender",
            "Coffee Grinder",
            "Chef Knife",
            "Cast Iron Skillet",
            "Toaster",
            "Linen Tablecloth",
            "Desk Lamp",
        ],
    ),
    (
        "CLOTH",
        "Clothing",
        &[
            "Cotton T-Shirt",
            "Wool Sweater",
            "Denim Jacket",
            "Silk Scarf",
            "Rain Coat",
            "Chino Trousers",
        ],
    ),
    (
        "SHOE",
        "Footwear",
        &["Running Shoes", "Leather Boots", "Sandals", "Loafers"],
    ),
];

const VARIANTS: &[&str] = &["Black", "White", "Navy", "Grey", "Olive"];

const DEFAULT_COUNT: usize = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;
    let mut db_path = String::from(DEFAULT_DATABASE_PATH);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if let Some(value) = args.get(i + 1) {
                    count = value
                        .parse()
                        .with_context(|| format!("invalid --count value '{value}'"))?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = value.clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Product Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: {DEFAULT_COUNT})");
                println!("  -d, --db <PATH>    Database file path (default: {DEFAULT_DATABASE_PATH})");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument '{other}', try --help"),
        }
        i += 1;
    }

    println!("Product Catalog Seed Data Generator");
    println!("===================================");
    println!("Database: {db_path}");
    println!("Products: {count}");
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open {db_path}"))?;
    let repo = db.products();

    let existing = repo.count().await?;
    if existing > 0 {
        println!("Database already has {existing} products, skipping seed.");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let products = generate_products(count)?;
    let written = repo.upsert_many(&products).await?;

    println!(
        "Generated {written} products in {:?}",
        start.elapsed()
    );

    for (_, category, _) in CATEGORIES {
        let page = catalog_core::ProductStore::find_by_category(
            &repo,
            category,
            &catalog_core::SortSpec::default(),
            catalog_core::validation::validate_page_request(0, 1)?,
        )
        .await?;
        println!("  {category:<16} {}", page.total_elements);
    }

    db.close().await;
    println!("Seed complete.");
    Ok(())
}

/// Builds `count` products, cycling through categories so each gets a share.
fn generate_products(count: usize) -> anyhow::Result<Vec<Product>> {
    (0..count)
        .map(|index| {
            let (prefix, category, names) = CATEGORIES[index % CATEGORIES.len()];
            let round = index / CATEGORIES.len();
            let name = names[round % names.len()];
            let variant = VARIANTS[(round / names.len()) % VARIANTS.len()];

            let sku = format!("{prefix}-{:03}", round + 1);
            let price_cents = 500 + ((index * 7_919) % 50_000) as i64;
            let description = format!("{name} ({variant})");

            Product::from_parts(sku, price_cents, description, category)
                .context("generated product failed validation")
        })
        .collect()
}
