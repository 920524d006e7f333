//! Pocket Store CLI - Terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! pocket catalog
//!
//! # Work with the cart (saved in $POCKET_STORE_DATA_DIR/cart.json)
//! pocket cart add 1
//! pocket cart set 1 3
//! pocket cart show
//!
//! # Place a simulated order and empty the cart
//! pocket checkout -n "Ada Lovelace" -e ada@example.com -a "12 St James's Square"
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products
//! - `cart` - Show or change the cart
//! - `checkout` - Simulated checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pocket_store_core::{CartStore, FileStore, ProductId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod render;

use commands::checkout::OrderForm;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "pocket")]
#[command(author, version, about = "Pocket Store terminal storefront")]
struct Cli {
    /// Directory holding the saved cart (overrides `POCKET_STORE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place a simulated order and empty the cart
    Checkout {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Print the confirmation as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show {
        /// Print the saved JSON layout instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product's line
    Remove { id: ProductId },
    /// Set a product's quantity (below 1 removes the line)
    Set {
        id: ProductId,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// One more unit of a product in the cart
    Inc { id: ProductId },
    /// One less unit of a product in the cart
    Dec { id: ProductId },
    /// Empty the cart
    Clear,
}

const DEFAULT_LOG_FILTER: &str = "pocket=info,pocket_store_core=info";

fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set.
    // The binary's own events carry the `pocket` target.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // Diagnostics go to stderr; stdout carries only rendered output.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?.with_data_dir(cli.data_dir);
    let catalog = config.load_catalog()?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Catalog => commands::catalog::list(&mut out, &catalog)?,
        Commands::Cart { action } => {
            let mut store = CartStore::open(catalog, FileStore::new(config.data_dir));
            run_cart_action(&mut out, &mut store, action)?;
        }
        Commands::Checkout {
            name,
            email,
            address,
            json,
        } => {
            let mut store = CartStore::open(catalog, FileStore::new(config.data_dir));
            let form = OrderForm {
                name,
                email,
                address,
            };
            commands::checkout::place_order(&mut out, &mut store, &form, json)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_cart_action(
    out: &mut impl Write,
    store: &mut CartStore<FileStore>,
    action: CartAction,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(data_dir = %store.storage().dir().display(), "Cart restored");

    match action {
        CartAction::Show { json } => commands::cart::show(out, store, json)?,
        CartAction::Add { id } => {
            commands::cart::add(out, store, id)?;
        }
        CartAction::Remove { id } => {
            commands::cart::remove(out, store, id)?;
        }
        CartAction::Set { id, quantity } => {
            commands::cart::set(out, store, id, &quantity)?;
        }
        CartAction::Inc { id } => {
            commands::cart::increment(out, store, id)?;
        }
        CartAction::Dec { id } => {
            commands::cart::decrement(out, store, id)?;
        }
        CartAction::Clear => {
            commands::cart::clear(out, store)?;
        }
    }
    Ok(())
}
