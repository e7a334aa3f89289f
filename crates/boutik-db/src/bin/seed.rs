//! # Seed Data Generator
//!
//! Populates the database with test products for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p boutik-db --bin seed
//!
//! # Specify database path
//! cargo run -p boutik-db --bin seed -- --db ./data/boutik.db
//! ```
//!
//! Seeding goes through the real supply operation, so every product
//! gets a `P###` id and a purchase movement exactly like a form
//! submission would produce.

use std::env;

use boutik_db::service::supplier::add_supplier;
use boutik_db::service::supply::{restock, SupplyRequest};
use boutik_db::{Database, DbConfig};

/// Catalog of (category, name, purchase cents, sale cents, quantity).
const PRODUCTS: &[(&str, &str, i64, i64, i64)] = &[
    ("Vivres", "Riz 5kg", 2800, 3500, 40),
    ("Vivres", "Riz 25kg", 13000, 16000, 12),
    ("Vivres", "Huile 1L", 1100, 1500, 30),
    ("Vivres", "Huile 5L", 5200, 6800, 10),
    ("Vivres", "Sucre 1kg", 600, 800, 50),
    ("Vivres", "Farine 1kg", 450, 650, 25),
    ("Vivres", "Lait en poudre 400g", 1800, 2400, 18),
    ("Hygiène", "Savon", 200, 350, 60),
    ("Hygiène", "Dentifrice", 700, 1000, 20),
    ("Hygiène", "Eau de javel 1L", 500, 750, 15),
    ("Boissons", "Eau minérale 1.5L", 250, 400, 48),
    ("Boissons", "Jus de bissap 1L", 600, 900, 12),
    ("Divers", "Bougie", 100, 200, 80),
    ("Divers", "Allumettes", 50, 100, 100),
    ("Divers", "Pile AA", 300, 500, 36),
];

const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("F001", "Grossiste Dakar", "33 800 00 00"),
    ("F002", "Marché Central", "77 123 45 67"),
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_arg().unwrap_or_else(|| "boutik.db".to_string());

    tracing::info!(path = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .expect("failed to open database");

    for &(id, name, contact) in SUPPLIERS {
        match add_supplier(&db, id, name, Some(contact)).await {
            Ok(_) => tracing::info!(id = %id, "supplier seeded"),
            Err(err) => tracing::warn!(id = %id, "supplier skipped: {}", err.user_message()),
        }
    }

    let mut seeded = 0usize;
    for &(category, name, purchase, sale, quantity) in PRODUCTS {
        let supplier = if category == "Vivres" { "F001" } else { "F002" };
        let request = SupplyRequest {
            name: name.to_string(),
            quantity,
            purchase_price_cents: purchase,
            sale_price_cents: sale,
            supplier_id: Some(supplier.to_string()),
            category: Some(category.to_string()),
        };
        match restock(&db, &request).await {
            Ok(outcome) => {
                seeded += 1;
                tracing::info!(id = %outcome.product.id, name = %name, "product seeded");
            }
            Err(err) => tracing::warn!(name = %name, "product skipped: {}", err.user_message()),
        }
    }

    tracing::info!(count = seeded, "Seeding complete");

    db.close().await;
}

/// Parses `--db <path>` from the command line.
fn parse_db_arg() -> Option<String> {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--db" {
            return args.next();
        }
    }
    None
}
