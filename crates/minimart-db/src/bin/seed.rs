//! # Seed Data Generator
//!
//! Populates a database with campus shop products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p minimart-db --bin seed
//!
//! # Specify database path
//! cargo run -p minimart-db --bin seed -- --db ./data/minimart.db
//! ```
//!
//! ## Generated Products
//! - Drinks (milk, juice, water)
//! - Snacks (crackers, fruit, sandwiches)
//! - Stationery (pens, notebooks, erasers)
//!
//! SKUs follow `{CATEGORY}-{NN}`; every product gets a barcode, a price
//! between $0.50 and $4.50 and 10-60 units of stock.

use std::env;

use minimart_core::{Money, NewProduct};
use minimart_db::{Database, DbConfig};

/// (sku prefix, category, product names)
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "DRK",
        "drinks",
        &[
            "Chocolate Milk 250ml",
            "Strawberry Milk 250ml",
            "Orange Juice Box",
            "Apple Juice Box",
            "Mineral Water 500ml",
            "Iced Tea 330ml",
        ],
    ),
    (
        "SNK",
        "snacks",
        &[
            "Cheese Crackers",
            "Granola Bar",
            "Banana",
            "Apple",
            "Ham Sandwich",
            "Rice Cake",
            "Pretzel Pack",
        ],
    ),
    (
        "STN",
        "stationery",
        &[
            "Ballpoint Pen Blue",
            "Ballpoint Pen Black",
            "Pencil HB",
            "Eraser",
            "A5 Notebook",
            "Ruler 30cm",
            "Glue Stick",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./minimart_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mini-Market POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./minimart_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mini-Market POS Seed Data Generator");
    println!("======================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    for (category_idx, (prefix, category, names)) in CATALOG.iter().enumerate() {
        for (idx, name) in names.iter().enumerate() {
            let product = generate_product(prefix, category, name, category_idx * 100 + idx);

            if let Err(e) = db.products().insert(&product).await {
                eprintln!("Failed to insert {}: {}", product.sku, e);
                continue;
            }
            generated += 1;
        }
    }

    println!("✓ Generated {} products", generated);

    let milk = db.products().list_active(Some("milk")).await?;
    println!("  Search 'milk': {} results", milk.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds one product with deterministic pseudo-random price and stock.
fn generate_product(prefix: &str, category: &str, name: &str, seed: usize) -> NewProduct {
    let sku = format!("{}-{:02}", prefix, seed % 100 + 1);

    // Barcode shape only (EAN-13 length, checksum not computed)
    let barcode = Some(format!("590{:010}", seed));

    // $0.50 - $4.50 in 25 cent steps
    let price_cents = 50 + ((seed * 7) % 17) as i64 * 25;

    let stock = 10 + ((seed * 13) % 51) as i64;

    NewProduct {
        name: name.to_string(),
        sku,
        price: Money::from_cents(price_cents),
        stock,
        category: Some(category.to_string()),
        barcode,
        is_active: true,
    }
}
