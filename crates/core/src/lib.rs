//! storecart core - shared value types.
//!
//! This crate provides the value types used across the storecart crates:
//! - `storecart` - Cart state manager, persistence adapter and checkout bridge
//! - `storecart-cli` - Command-line driver over a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and product snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
