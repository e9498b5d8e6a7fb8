//! # Seed Data Generator
//!
//! Populates the catalog with demo books for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 books (default)
//! cargo run -p bookshop-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p bookshop-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p bookshop-db --bin seed -- --db ./data/bookshop.db
//! ```
//!
//! ## Generated Books
//! Each book has:
//! - Unique reference: `{SHELF}-{NNNNN}`
//! - Title from a shelf's list plus an edition suffix
//! - Deterministic price: 4.99 - 39.99
//! - Deterministic stock: 0 - 40 (some sold out, some low)
//!
//! Running it twice is safe: existing references are skipped.

use bookshop_core::Money;
use bookshop_db::{Database, DbConfig, DbError, NewBook};
use std::env;

/// Shelves with the authors and titles they hold
const SHELVES: &[(&str, &[(&str, &str)])] = &[
    (
        "FIC",
        &[
            ("Dune", "Frank Herbert"),
            ("Emma", "Jane Austen"),
            ("Middlemarch", "George Eliot"),
            ("Beloved", "Toni Morrison"),
            ("Ulysses", "James Joyce"),
            ("The Trial", "Franz Kafka"),
            ("Things Fall Apart", "Chinua Achebe"),
            ("Rebecca", "Daphne du Maurier"),
        ],
    ),
    (
        "SCI",
        &[
            ("A Brief History of Time", "Stephen Hawking"),
            ("The Selfish Gene", "Richard Dawkins"),
            ("Cosmos", "Carl Sagan"),
            ("The Origin of Species", "Charles Darwin"),
            ("Silent Spring", "Rachel Carson"),
            ("The Double Helix", "James Watson"),
        ],
    ),
    (
        "CMP",
        &[
            ("The Rust Programming Language", "Steve Klabnik"),
            ("Structure and Interpretation of Computer Programs", "Harold Abelson"),
            ("The Pragmatic Programmer", "Andrew Hunt"),
            ("Designing Data-Intensive Applications", "Martin Kleppmann"),
            ("Clean Code", "Robert Martin"),
        ],
    ),
    (
        "KID",
        &[
            ("Matilda", "Roald Dahl"),
            ("The Gruffalo", "Julia Donaldson"),
            ("Charlotte's Web", "E. B. White"),
            ("Where the Wild Things Are", "Maurice Sendak"),
        ],
    ),
];

/// Edition suffixes, so that titles repeat with distinct references
const EDITIONS: &[&str] = &["", " (Paperback)", " (Hardcover)", " (Illustrated)", " (Anniversary Edition)"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./data/bookshop.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bookshop POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of books to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./data/bookshop.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bookshop POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Books:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");
    println!();
    println!("Generating books...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut skipped = 0;

    for seed in 0..count {
        let book = generate_book(seed);
        let reference_no = book.reference_no.clone();

        match db.books().insert(book).await {
            Ok(_) => generated += 1,
            Err(DbError::UniqueViolation { .. }) => skipped += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", reference_no, e),
        }

        if (generated + skipped) % 100 == 0 && generated + skipped > 0 {
            println!("  Processed {} books...", generated + skipped);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} books in {:?} ({} already present)", generated, elapsed, skipped);

    println!();
    println!("Catalog summary:");
    println!("  Active:        {}", db.books().count_active().await?);
    println!("  Low stock (≤3): {}", db.books().list_low_stock(3).await?.len());
    println!("  Out of stock:  {}", db.books().list_out_of_stock().await?.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Generates a single book with deterministic data.
fn generate_book(seed: usize) -> NewBook {
    let (shelf, titles) = SHELVES[seed % SHELVES.len()];
    let (title, author) = titles[(seed / SHELVES.len()) % titles.len()];
    let edition = EDITIONS[(seed / 7) % EDITIONS.len()];

    // 4.99 - 39.99
    let price_cents = 499 + ((seed * 37) % 36) as i64 * 100;

    // Every 13th sold out, every 5th low, the rest 10 - 40
    let stock = if seed % 13 == 0 {
        0
    } else if seed % 5 == 0 {
        1 + (seed % 3) as i64
    } else {
        10 + (seed % 31) as i64
    };

    NewBook {
        title: format!("{}{}", title, edition),
        author: Some(author.to_string()),
        reference_no: format!("{}-{:05}", shelf, seed),
        price: Money::from_cents(price_cents),
        stock,
    }
}
