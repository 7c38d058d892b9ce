//! CLI command implementations.

pub mod cart;
pub mod checkout;

use storecart::{
    CartConfig, CartPersistence, CartStore, CartView, FileStore, NotificationKind,
    RecordingNotifier,
};
use thiserror::Error;

/// Cart type driven by the CLI.
pub type CliCart = CartStore<FileStore, RecordingNotifier>;

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The cart rejected the operation.
    #[error(transparent)]
    Cart(#[from] storecart::CartError),

    /// Checkout could not be completed.
    #[error(transparent)]
    Checkout(#[from] storecart::CheckoutError),

    /// Configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] storecart::ConfigError),

    /// The price argument is not a valid non-negative decimal.
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] storecart_core::PriceError),

    /// A required setting is missing.
    #[error("Missing setting: {0}")]
    Missing(&'static str),
}

/// Open the configured cart and load it.
pub fn open_store(config: &CartConfig) -> CliCart {
    tracing::debug!(path = %config.storage_path.display(), "Opening cart storage");
    let persistence = CartPersistence::with_key(
        FileStore::new(&config.storage_path),
        config.storage_key.clone(),
    );
    let mut store = CartStore::with_persistence(persistence, RecordingNotifier::default());
    store.load(config.force_empty);
    store
}

/// Print and discard the notifications raised by the last command.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn print_notifications(store: &mut CliCart) {
    for notification in store.notifier_mut().drain() {
        match notification.kind {
            NotificationKind::Success => println!("✔ {}", notification.message),
            NotificationKind::Error => eprintln!("✘ {}", notification.message),
        }
    }
}

/// Render the cart as a table.
#[allow(clippy::print_stdout)]
pub fn print_view(view: &CartView) {
    if view.is_empty() {
        println!("Your cart is empty");
        println!("Total: {}", view.subtotal);
        return;
    }

    println!(
        "{:>8}  {:<24} {:>10} {:>5} {:>12}",
        "ID", "Product", "Price", "Qty", "Line total"
    );
    for item in &view.items {
        println!(
            "{:>8}  {:<24} {:>10} {:>5} {:>12}",
            item.product_id.as_i64(), item.title, item.price, item.quantity, item.line_price
        );
    }
    println!("{} item(s), total {}", view.item_count, view.subtotal);
}
