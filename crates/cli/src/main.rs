//! storecart CLI - drive a file-backed cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two mugs
//! cart add --id 7 --name "Mug" --price 12.50 --quantity 2
//!
//! # Change quantities
//! cart set 7 3
//! cart inc 7
//! cart dec 7
//!
//! # Show the cart
//! cart show
//!
//! # Print the purchase form fields
//! cart payload --csrf token
//!
//! # Check out against the storefront in STOREFRONT_BASE_URL
//! cart checkout
//! ```
//!
//! # Commands
//!
//! - `show` - Render the cart
//! - `add`, `set`, `inc`, `dec`, `remove`, `clear` - Mutate the cart
//! - `payload` - Print the checkout form fields
//! - `checkout` - Sign-in probe, then purchase submission

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "storecart shopping cart")]
struct Cli {
    /// File backing the cart storage (overrides `CART_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Storage key of the cart (overrides `CART_STORAGE_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    /// Discard the persisted cart before running the command
    #[arg(long, global = true)]
    force_empty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: i64,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 12.50
        #[arg(long)]
        price: String,

        /// Product description
        #[arg(long)]
        description: Option<String>,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set the quantity of a line (0 or less removes it)
    Set {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit to a line
    Inc { id: i64 },
    /// Remove one unit from a line
    Dec { id: i64 },
    /// Remove a line
    Remove { id: i64 },
    /// Empty the cart
    Clear,
    /// Print the checkout form fields
    Payload {
        /// CSRF token (overrides `STOREFRONT_CSRF_TOKEN`)
        #[arg(long)]
        csrf: Option<String>,
    },
    /// Submit the cart to the storefront
    Checkout {
        /// CSRF token (overrides `STOREFRONT_CSRF_TOKEN`)
        #[arg(long)]
        csrf: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storecart=info,storecart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = storecart::CartConfig::from_env()?;
    if let Some(path) = cli.storage {
        config.storage_path = path;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }
    config.force_empty |= cli.force_empty;

    let mut store = commands::open_store(&config);

    let result = match cli.command {
        Commands::Show => Ok(()),
        Commands::Add {
            id,
            name,
            price,
            description,
            quantity,
        } => commands::cart::add(&mut store, id, name, &price, description, quantity),
        Commands::Set { id, quantity } => commands::cart::set(&mut store, id, quantity),
        Commands::Inc { id } => commands::cart::increment(&mut store, id),
        Commands::Dec { id } => {
            commands::cart::decrement(&mut store, id);
            Ok(())
        }
        Commands::Remove { id } => {
            commands::cart::remove(&mut store, id);
            Ok(())
        }
        Commands::Clear => {
            store.clear();
            Ok(())
        }
        Commands::Payload { csrf } => commands::checkout::payload(&mut store, &config, csrf),
        Commands::Checkout { csrf } => {
            commands::checkout::checkout(&mut store, &config, csrf).await
        }
    };

    commands::print_notifications(&mut store);
    result?;
    commands::print_view(&store.view());
    Ok(())
}
