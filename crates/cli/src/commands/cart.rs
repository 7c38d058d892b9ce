//! Cart mutation commands.

use storecart_core::{Price, Product, ProductId};

use super::{CliCart, CommandError};

/// Add a product built from command-line arguments.
///
/// # Errors
///
/// Returns an error if the price does not parse or the quantity is invalid.
pub fn add(
    store: &mut CliCart,
    id: i64,
    name: String,
    price: &str,
    description: Option<String>,
    quantity: i64,
) -> Result<(), CommandError> {
    let unit_price: Price = price.parse()?;
    let product = Product {
        id: ProductId::new(id),
        name,
        unit_price,
        description,
    };
    store.add(&product, quantity)?;
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the quantity is out of range.
pub fn set(store: &mut CliCart, id: i64, quantity: i64) -> Result<(), CommandError> {
    store.set_quantity(ProductId::new(id), quantity)?;
    Ok(())
}

/// Add one unit to a line.
///
/// # Errors
///
/// Returns an error if the line is already at its maximum.
pub fn increment(store: &mut CliCart, id: i64) -> Result<(), CommandError> {
    store.increment(ProductId::new(id))?;
    Ok(())
}

/// Remove one unit from a line.
pub fn decrement(store: &mut CliCart, id: i64) {
    store.decrement(ProductId::new(id));
}

/// Remove a line.
pub fn remove(store: &mut CliCart, id: i64) {
    store.remove(ProductId::new(id));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::open_store;
    use storecart::CartConfig;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> CartConfig {
        CartConfig {
            storage_path: dir.path().join("storage.json"),
            ..CartConfig::default()
        }
    }

    #[test]
    fn test_add_persists_between_invocations() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let mut store = open_store(&config);
        add(&mut store, 7, "Mug".to_owned(), "$12.50", None, 2).unwrap();

        let reopened = open_store(&config);
        assert_eq!(reopened.item_count(), 2);
        assert_eq!(reopened.view().subtotal, "$25.00");
    }

    #[test]
    fn test_add_rejects_bad_price() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&config(&dir));
        let err = add(&mut store, 7, "Mug".to_owned(), "-1", None, 1).unwrap_err();
        assert!(matches!(err, CommandError::InvalidPrice(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_force_empty_discards_previous_cart() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);

        let mut store = open_store(&config);
        add(&mut store, 1, "Tea".to_owned(), "3", None, 1).unwrap();

        config.force_empty = true;
        assert!(open_store(&config).is_empty());

        config.force_empty = false;
        assert!(open_store(&config).is_empty());
    }

    #[test]
    fn test_set_and_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&config(&dir));
        add(&mut store, 1, "Tea".to_owned(), "3", None, 1).unwrap();

        set(&mut store, 1, 4).unwrap();
        increment(&mut store, 1).unwrap();
        decrement(&mut store, 1);
        assert_eq!(store.item_count(), 4);

        remove(&mut store, 1);
        assert!(store.is_empty());
    }
}
