//! Cart error types.
//!
//! Only failures the caller has to react to surface here. Storage write
//! errors and unreadable persisted data are logged by the store and never
//! reach the caller; the in-memory cart stays authoritative for the session.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity below one, or an accumulated quantity that does not fit.
    #[error("Quantity must be greater than 0 (got {quantity})")]
    InvalidQuantity { quantity: i64 },

    /// The change would push a line total or the cart total past the
    /// decimal range.
    #[error("Cart total is too large")]
    TotalOverflow,

    /// Checkout was requested for a cart without lines.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The persisted cart could not be written. Returned by
    /// [`CartPersistence::try_save`](crate::CartPersistence::try_save).
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
}
