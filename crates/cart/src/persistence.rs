//! Persisted cart format.
//!
//! The cart is stored under a single key as a JSON array of
//! `[productId, line]` pairs, in cart order:
//!
//! ```json
//! [[7, {"id": 7, "nombre": "Mug", "precio": "10", "quantity": 2}]]
//! ```
//!
//! Older writers stored prices as JSON numbers and some stored the product
//! id key as a string; both are accepted on load.

use serde::Deserialize;
use storecart_core::{Price, ProductId};

use crate::error::CartError;
use crate::line::{CartLine, Totals};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key used when none is configured.
pub const DEFAULT_KEY: &str = "cartItems";

/// Reads and writes the cart under one key of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under [`DEFAULT_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The underlying store, mutably.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the adapter and return the store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Write `lines`, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if encoding fails or the store
    /// rejects the write.
    pub fn try_save(&mut self, lines: &[CartLine]) -> Result<(), CartError> {
        let entries: Vec<(ProductId, &CartLine)> =
            lines.iter().map(|line| (line.product_id, line)).collect();
        let encoded = serde_json::to_string(&entries).map_err(StorageError::from)?;
        self.store.set(&self.key, &encoded)?;
        Ok(())
    }

    /// Write `lines`. Failures are logged and otherwise ignored.
    pub fn save(&mut self, lines: &[CartLine]) {
        if let Err(e) = self.try_save(lines) {
            tracing::warn!(key = %self.key, error = %e, "Error saving cart to storage");
        }
    }

    /// Read the persisted cart.
    ///
    /// A missing record, an unreadable store or unparseable contents all
    /// yield an empty cart.
    pub fn load(&self) -> Vec<CartLine> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Error reading cart from storage");
                return Vec::new();
            }
        };

        match decode(&raw) {
            Ok(lines) => lines,
            Err(reason) => {
                tracing::warn!(key = %self.key, %reason, "Error parsing cart data");
                Vec::new()
            }
        }
    }

    /// Delete the persisted record. Failures are logged.
    pub fn erase(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Error erasing cart from storage");
        }
    }
}

/// Product id as written by any past version: number or numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredKey {
    Number(i64),
    Text(String),
}

impl TryFrom<StoredKey> for ProductId {
    type Error = String;

    fn try_from(key: StoredKey) -> Result<Self, Self::Error> {
        match key {
            StoredKey::Number(n) => Ok(Self::new(n)),
            StoredKey::Text(s) => s.parse().map_err(|e| format!("bad product id {s:?}: {e}")),
        }
    }
}

#[derive(Deserialize)]
struct StoredLine {
    nombre: String,
    precio: Price,
    quantity: i64,
    #[serde(default)]
    descripcion: Option<String>,
}

fn decode(raw: &str) -> Result<Vec<CartLine>, String> {
    let entries: Vec<(StoredKey, StoredLine)> =
        serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut lines: Vec<CartLine> = Vec::with_capacity(entries.len());
    let mut totals = Totals::default();
    for (key, stored) in entries {
        let product_id = ProductId::try_from(key)?;
        if stored.quantity < 1 {
            tracing::debug!(%product_id, quantity = stored.quantity, "Dropping empty cart line");
            continue;
        }
        let quantity = u32::try_from(stored.quantity)
            .map_err(|_| format!("quantity {} out of range", stored.quantity))?;
        if lines.iter().any(|line| line.product_id == product_id) {
            tracing::debug!(%product_id, "Dropping duplicate cart line");
            continue;
        }
        let line = CartLine {
            product_id,
            name: stored.nombre,
            unit_price: stored.precio,
            quantity,
            description: stored.descripcion,
        };
        let Some(next) = totals.with(&line) else {
            tracing::warn!(%product_id, "Dropping cart line whose total is out of range");
            continue;
        };
        totals = next;
        lines.push(line);
    }
    Ok(lines)
}
