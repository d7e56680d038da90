//! # Seed Data Generator
//!
//! Creates the shop owner account and a starter catalog.
//!
//! ## Usage
//! ```bash
//! # Seed ./sweetshop.db with the default owner password
//! cargo run -p sweetshop-db --bin seed
//!
//! # Specify database path and owner password
//! cargo run -p sweetshop-db --bin seed -- --db ./data/shop.db --admin-password hunter22
//! ```
//!
//! ## What Gets Created
//! - `admin@sweetshop.com` (role ADMIN, name "Owner")
//! - Rainbow Lollipop, Chocolate Frog, Sour Worms
//!
//! Nothing is written when the database already holds items or accounts.

use anyhow::{bail, Context};
use std::env;
use sweetshop_core::{ItemDraft, Money, Role};
use sweetshop_db::password::hash_password;
use sweetshop_db::{Database, DbConfig};

const ADMIN_EMAIL: &str = "admin@sweetshop.com";
const ADMIN_NAME: &str = "Owner";

/// (name, category, price in cents, quantity, image)
const CATALOG: &[(&str, &str, i64, i64, &str)] = &[
    (
        "Rainbow Lollipop",
        "Hard Candy",
        250,
        50,
        "https://images.unsplash.com/photo-1575224300306-1b8da36134ec?w=400",
    ),
    (
        "Chocolate Frog",
        "Chocolate",
        400,
        20,
        "https://images.unsplash.com/photo-1548907040-4baa42d10919?w=400",
    ),
    (
        "Sour Worms",
        "Gummy",
        150,
        100,
        "https://images.unsplash.com/photo-1582058091505-f87a2e55a40f?w=400",
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./sweetshop.db".to_string());
    let mut admin_password = String::from("admin123");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-password" | "-p" => {
                if i + 1 < args.len() {
                    admin_password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("SweetShop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>                Database file path (default: ./sweetshop.db)");
                println!("  -p, --admin-password <PASS>    Owner account password (default: admin123)");
                println!("  -h, --help                     Show this help message");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    if let Err(e) = sweetshop_core::validation::validate_password(&admin_password) {
        bail!("admin password rejected: {e}");
    }

    println!("🍬 SweetShop Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let items = db.items().count().await?;
    let accounts = db.accounts().count().await?;
    if items > 0 || accounts > 0 {
        println!(
            "⚠ Database already has {} items and {} accounts",
            items, accounts
        );
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let hash = hash_password(&admin_password)?;
    let owner = db
        .accounts()
        .create(ADMIN_EMAIL, Some(ADMIN_NAME), &hash, Role::Admin)
        .await?;
    println!("✓ Created {} ({})", owner.email, owner.role);

    for (name, category, cents, quantity, image) in CATALOG {
        let item = db
            .items()
            .create(ItemDraft {
                name: Some(name.to_string()),
                category: Some(category.to_string()),
                price: Some(Money::from_cents(*cents)),
                quantity: Some(*quantity),
                image_url: Some(image.to_string()),
            })
            .await
            .with_context(|| format!("inserting {name}"))?;
        println!("  + {} [{}] {} × {}", item.name, item.category, item.price, item.quantity);
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
