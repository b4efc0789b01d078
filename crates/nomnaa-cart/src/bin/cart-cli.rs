//! # cart-cli
//!
//! Drives the cart service against a local database, printing each outcome
//! as JSON (`{"cart": ..., "status": 200, "error": null}`).
//!
//! ## Usage
//! ```bash
//! cargo run -p nomnaa-cart --bin cart-cli -- --user <UUID> open
//! cargo run -p nomnaa-cart --bin cart-cli -- --user <UUID> add --snack <SNACK_ID> --quantity 3
//! cargo run -p nomnaa-cart --bin cart-cli -- --user <UUID> update --item <ITEM_ID> --quantity 1
//! cargo run -p nomnaa-cart --bin cart-cli -- --user <UUID> delete --item <ITEM_ID>
//! cargo run -p nomnaa-cart --bin cart-cli -- --user <UUID> show
//! cargo run -p nomnaa-cart --bin cart-cli -- --user <UUID> confirm --cart <CART_ID>
//! cargo run -p nomnaa-cart --bin cart-cli -- snacks --limit 20
//! cargo run -p nomnaa-cart --bin cart-cli -- status
//! ```
//!
//! The database path and pool size come from `NOMNAA_*` variables
//! (see `ShopConfig`); `--db` overrides the path.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use nomnaa_cart::telemetry::init_tracing;
use nomnaa_cart::{CartOutcome, CartService, ShopConfig};
use nomnaa_core::{AddItemToCartRequest, UpdateItemFromCartRequest, UserContext};
use nomnaa_db::migrations::migration_status;
use nomnaa_db::Database;

#[derive(Debug, Parser)]
#[command(name = "cart-cli", about = "Nom-Naa cart service CLI", long_about = None)]
struct Cli {
    /// Database file path (overrides NOMNAA_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Caller user id
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open (or return) the caller's pending cart
    Open,
    /// Add units of a snack to the pending cart
    Add(AddArgs),
    /// Set the quantity of a cart line
    Update(UpdateArgs),
    /// Remove a cart line
    Delete(ItemArgs),
    /// Show the caller's pending cart
    Show,
    /// Confirm a cart
    Confirm(ConfirmArgs),
    /// List snacks on the shelf
    Snacks(SnacksArgs),
    /// Database health and migrations
    Status,
}

#[derive(Debug, Args)]
struct SnacksArgs {
    #[arg(long, default_value_t = 50)]
    limit: u32,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Snack id
    #[arg(long)]
    snack: String,

    #[arg(long, default_value_t = 1)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Cart item id
    #[arg(long)]
    item: String,

    #[arg(long)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct ItemArgs {
    /// Cart item id
    #[arg(long)]
    item: String,
}

#[derive(Debug, Args)]
struct ConfirmArgs {
    /// Cart id
    #[arg(long)]
    cart: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match ShopConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    init_tracing(&config.log_filter);

    match run(cli, &config).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &ShopConfig) -> Result<ExitCode, String> {
    let db = Database::new(config.db_config())
        .await
        .map_err(|error| format!("failed to open database: {error}"))?;

    info!(path = %config.db_path.display(), "Database ready");

    let Cli { user, command, .. } = cli;
    let caller = user
        .map(|id| UserContext::new(id, "cli"))
        .ok_or_else(|| "--user is required for cart commands".to_string());

    let service = CartService::new(db.clone());

    let result = match command {
        Commands::Snacks(args) => {
            let listing = snacks(&db, args.limit).await;
            db.close().await;
            return listing;
        }
        Commands::Status => {
            let report = status(&db).await;
            db.close().await;
            return report;
        }
        Commands::Open => service.open_cart(&caller?).await,
        Commands::Add(args) => {
            let req = AddItemToCartRequest::new(args.snack, args.quantity);
            service.add_item_to_cart(&req, &caller?).await
        }
        Commands::Update(args) => {
            let req = UpdateItemFromCartRequest::new(args.item, args.quantity);
            service.update_item_from_cart(&req, &caller?).await
        }
        Commands::Delete(args) => service.delete_item_from_cart(&args.item, &caller?).await,
        Commands::Show => match caller?.user_id() {
            Ok(user_id) => service.get_cart_by_id(&user_id).await,
            Err(error) => Err(error.into()),
        },
        Commands::Confirm(args) => service.confirm_cart(&args.cart, &caller?).await,
    };

    let outcome = CartOutcome::from(result);
    let success = outcome.status.is_success();
    let json = serde_json::to_string_pretty(&outcome)
        .map_err(|error| format!("failed to encode outcome: {error}"))?;
    println!("{json}");

    db.close().await;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn snacks(db: &Database, limit: u32) -> Result<ExitCode, String> {
    let snacks = db
        .snacks()
        .list(limit)
        .await
        .map_err(|error| format!("failed to list snacks: {error}"))?;
    let json = serde_json::to_string_pretty(&snacks)
        .map_err(|error| format!("failed to encode snacks: {error}"))?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

async fn status(db: &Database) -> Result<ExitCode, String> {
    let healthy = db.health_check().await;
    let (known, applied) = migration_status(db.pool())
        .await
        .map_err(|error| format!("failed to read migrations: {error}"))?;
    let carts = db
        .carts()
        .count()
        .await
        .map_err(|error| format!("failed to count carts: {error}"))?;
    let snacks = db
        .snacks()
        .count()
        .await
        .map_err(|error| format!("failed to count snacks: {error}"))?;

    let report = serde_json::json!({
        "healthy": healthy,
        "migrations": { "applied": applied, "known": known },
        "carts": carts,
        "snacks": snacks,
    });
    println!("{report:#}");

    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
