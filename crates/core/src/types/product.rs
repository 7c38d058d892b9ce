//! Product snapshot offered to the cart.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as shown on a product card at the moment it is added.
///
/// The cart copies these attributes into its line; later changes to the
/// catalog do not reach lines already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Create a product snapshot without a description.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
