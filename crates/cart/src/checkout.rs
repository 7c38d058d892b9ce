//! Purchase payload for the checkout endpoint.
//!
//! The purchase endpoint binds a list of products from positionally
//! indexed form fields:
//!
//! ```text
//! _csrf=...
//! productos[0].productoId=7
//! productos[0].cantidad=2
//! productos[1].productoId=3
//! productos[1].cantidad=1
//! ```
//!
//! Positions follow cart order.

use serde::Serialize;
use storecart_core::ProductId;

use crate::error::CartError;
use crate::line::CartLine;

/// Form field carrying the anti-forgery token.
pub const CSRF_FIELD: &str = "_csrf";

/// One product to purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Products to purchase, in cart order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutPayload {
    items: Vec<CheckoutItem>,
}

impl CheckoutPayload {
    /// Build a payload from cart lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] if `lines` is empty.
    pub fn from_lines(lines: &[CartLine]) -> Result<Self, CartError> {
        if lines.is_empty() {
            return Err(CartError::EmptyCart);
        }
        Ok(Self {
            items: lines
                .iter()
                .map(|line| CheckoutItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        })
    }

    /// Items in submission order.
    #[must_use]
    pub fn items(&self) -> &[CheckoutItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; an empty payload cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Encode as ordered form fields, CSRF token first.
    #[must_use]
    pub fn form_fields(&self, csrf_token: &str) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(1 + self.items.len() * 2);
        fields.push((CSRF_FIELD.to_owned(), csrf_token.to_owned()));
        for (index, item) in self.items.iter().enumerate() {
            fields.push((
                format!("productos[{index}].productoId"),
                item.product_id.to_string(),
            ));
            fields.push((
                format!("productos[{index}].cantidad"),
                item.quantity.to_string(),
            ));
        }
        fields
    }
}
