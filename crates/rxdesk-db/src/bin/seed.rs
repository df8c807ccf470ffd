//! # Seed Data Generator
//!
//! Fills a database with sample medicines for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p rxdesk-db --bin seed
//!
//! # Specify database path and stock level
//! cargo run -p rxdesk-db --bin seed -- --db ./data/rxdesk.db --stock 50
//! ```
//!
//! Each manufacturer gets every product in every strength, so the inventory
//! page has a realistic mix of names that differ only by dosage.

use std::env;

use rxdesk_core::validation::validate_new_medicine;
use rxdesk_core::{Money, NewMedicine};
use rxdesk_db::{Database, DbConfig};

/// (name, strengths, base price in cents)
const PRODUCTS: &[(&str, &[&str], i64)] = &[
    ("Paracetamol", &["500mg tablet", "1g tablet"], 250),
    ("Ibuprofen", &["200mg tablet", "400mg tablet"], 399),
    ("Amoxicillin", &["250mg capsule", "500mg capsule"], 1000),
    ("Cetirizine", &["10mg tablet"], 549),
    ("Omeprazole", &["20mg capsule", "40mg capsule"], 825),
    ("Metformin", &["500mg tablet", "850mg tablet"], 675),
    ("Salbutamol", &["100mcg inhaler"], 1450),
    ("Loratadine", &["10mg tablet"], 499),
];

const MANUFACTURERS: &[&str] = &["Acme Pharma", "Generico", "Northwind Labs"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./rxdesk_dev.db");
    let mut stock: i64 = 20;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if i + 1 < args.len() {
                    stock = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("RxDesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./rxdesk_dev.db)");
                println!("  -s, --stock <N>     Quantity on hand per medicine (default: 20)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("RxDesk Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!("Stock:    {}", stock);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");

    let existing = db.medicines().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} medicines", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut generated = 0;
    for (m_idx, manufacturer) in MANUFACTURERS.iter().enumerate() {
        for (name, strengths, base_cents) in PRODUCTS {
            for (s_idx, strength) in strengths.iter().enumerate() {
                let medicine = sample_medicine(name, strength, manufacturer, *base_cents, m_idx, s_idx, stock);

                if let Err(e) = validate_new_medicine(&medicine) {
                    eprintln!("Skipping {}: {}", medicine.name, e);
                    continue;
                }

                if let Err(e) = db.medicines().insert(&medicine).await {
                    eprintln!("Failed to insert {}: {}", medicine.name, e);
                    continue;
                }
                generated += 1;
            }
        }
    }

    println!("✓ Generated {} medicines", generated);
    db.close().await;
    Ok(())
}

/// Generics are cheaper; higher strengths cost a little more.
fn sample_medicine(
    name: &str,
    strength: &str,
    manufacturer: &str,
    base_cents: i64,
    manufacturer_idx: usize,
    strength_idx: usize,
    stock: i64,
) -> NewMedicine {
    let discount = if manufacturer_idx == 1 { base_cents / 4 } else { 0 };
    let price_cents = base_cents - discount + (strength_idx as i64) * 150;

    NewMedicine::new(name, strength, manufacturer, Money::from_cents(price_cents), stock)
}
