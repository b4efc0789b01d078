//! # Seed Data Generator
//!
//! Populates the database with snacks (and optionally a pending cart) for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 60 snacks (default)
//! cargo run -p nomnaa-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p nomnaa-db --bin seed -- --count 200 --db ./data/nomnaa.db
//!
//! # Also open a pending cart for a user
//! cargo run -p nomnaa-db --bin seed -- --user 550e8400-e29b-41d4-a716-446655440000
//! ```
//!
//! Each snack gets a name from the catalogue below plus a pack size, a price
//! between 10.00 and 99.00, and a stock level between 0 and 50.

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nomnaa_core::validation::validate_uuid;
use nomnaa_core::Snack;
use nomnaa_db::repository::snack::generate_snack_id;
use nomnaa_db::{Database, DbConfig, DbError};

/// Snack names for realistic test data.
const SNACKS: &[&str] = &[
    "Lays Classic",
    "Lays Nori Seaweed",
    "Tao Kae Noi Crispy Seaweed",
    "Pocky Chocolate",
    "Pocky Strawberry",
    "Koh-Kae Peanuts",
    "Bento Squid Snack",
    "Hanami Prawn Crackers",
    "Dorito Nacho Cheese",
    "Pringles Original",
    "Mama Instant Noodles",
    "Jele Beautie",
    "Yupi Gummy",
    "Oreo",
    "Voice Wafer",
];

/// Pack sizes with their price addon in minor units.
const SIZES: &[(&str, i64)] = &[("Mini", 0), ("Regular", 1000), ("Family", 3500), ("Party", 6000)];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Seed the Nom-Naa cart database with snacks")]
struct Args {
    /// Number of snacks to generate
    #[arg(short, long, default_value_t = 60)]
    count: usize,

    /// Database file path
    #[arg(short, long, default_value = "./nomnaa_dev.db")]
    db: String,

    /// Open a pending cart for this user id
    #[arg(short, long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args = Args::parse();

    println!("Nom-Naa Seed Data Generator");
    println!("===========================");
    println!("Database: {}", args.db);
    println!("Snacks:   {}", args.count);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    let existing = db.snacks().count().await?;
    if existing > 0 {
        println!("Database already has {} snacks, skipping snack seed.", existing);
    } else {
        let start = std::time::Instant::now();
        let mut generated = 0;

        'outer: for (name_idx, name) in SNACKS.iter().enumerate() {
            for (size_idx, (size, price_addon)) in SIZES.iter().enumerate() {
                if generated >= args.count {
                    break 'outer;
                }

                let snack = generate_snack(name, size, *price_addon, name_idx * SIZES.len() + size_idx);
                if let Err(e) = db.snacks().insert(&snack).await {
                    warn!(name = %snack.name, error = %e, "Failed to insert snack");
                    continue;
                }
                generated += 1;
            }
        }

        info!(generated, elapsed = ?start.elapsed(), "Snacks generated");
        println!("Generated {} snacks in {:?}", generated, start.elapsed());
    }

    if let Some(user) = args.user {
        let user_id = validate_uuid("user", &user)?;
        match db.carts().create_pending(&user_id).await {
            Ok(cart) => println!("Opened pending cart {} for user {}", cart.id, user_id),
            Err(DbError::UniqueViolation { .. }) => {
                println!("User {} already has a pending cart", user_id)
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    println!("Seed complete!");

    db.close().await;
    Ok(())
}

/// Generates a single snack with deterministic pseudo-random data.
fn generate_snack(name: &str, size: &str, price_addon: i64, seed: usize) -> Snack {
    let now = Utc::now();

    let base_price = 1000 + ((seed * 37) % 30) as i64 * 100;
    let quantity = (seed * 7 % 51) as i64;

    Snack {
        id: generate_snack_id(),
        name: format!("{} {}", name, size),
        description: Some(format!("{} pack of {}", size, name)),
        price_cents: base_price + price_addon,
        quantity,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}
