//! storecart - client-side shopping cart state manager.
//!
//! The cart owns an ordered list of lines keyed by product. Every mutation
//! writes through to a durable key-value store, recomputes the derived
//! totals and then hands a [`CartView`] to registered render callbacks.
//!
//! # Architecture
//!
//! - [`store`] - `CartStore`, the only owner of cart state
//! - [`storage`] - `KeyValueStore` trait with in-memory and file backends
//! - [`persistence`] - JSON wire format of the persisted cart
//! - [`checkout`] - positional form payload for the purchase endpoint
//! - [`client`] - HTTP driver for the authentication probe and purchase submission
//! - [`notify`] - success/error notification sink
//! - [`view`] - render-ready cart view
//! - [`config`] - environment configuration
//!
//! # Example
//!
//! ```rust
//! use storecart::{CartStore, MemoryStore, RecordingNotifier};
//! use storecart_core::{Product, ProductId};
//!
//! let mut cart = CartStore::new(MemoryStore::new(), RecordingNotifier::default());
//! cart.load(false);
//!
//! let mug = Product::new(ProductId::new(1), "Mug", "10".parse().unwrap());
//! cart.add(&mug, 2).unwrap();
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().to_string(), "20");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod client;
pub mod config;
pub mod error;
pub mod line;
pub mod notify;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod view;

pub use checkout::{CheckoutItem, CheckoutPayload};
pub use client::{CheckoutError, CheckoutOutcome, StorefrontClient};
pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use line::CartLine;
pub use notify::{Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier};
pub use persistence::CartPersistence;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::CartStore;
pub use view::{CartItemView, CartView};
