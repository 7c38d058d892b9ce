//! Render-ready cart data.
//!
//! Render callbacks get a [`CartView`] with prices already formatted, so a
//! view layer only has to place strings.

use rust_decimal::Decimal;
use storecart_core::{Price, ProductId};

use crate::line::CartLine;

/// One row of the cart table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
    /// Whether the "proceed to checkout" action should be enabled.
    pub checkout_enabled: bool,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::format_amount(Decimal::ZERO),
            item_count: 0,
            checkout_enabled: false,
        }
    }

    pub(crate) fn new(lines: &[CartLine], total: Decimal, item_count: u64) -> Self {
        if lines.is_empty() {
            return Self::empty();
        }
        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            subtotal: Price::format_amount(total),
            item_count,
            checkout_enabled: true,
        }
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            title: line.name.clone(),
            description: line.description.clone(),
            quantity: line.quantity,
            price: line.unit_price.to_string(),
            line_price: line
                .line_total()
                .map_or_else(String::new, Price::format_amount),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_view() {
        let view = CartView::new(&[], Decimal::ZERO, 0);
        assert!(view.is_empty());
        assert_eq!(view.subtotal, "$0.00");
        assert!(!view.checkout_enabled);
    }

    #[test]
    fn test_formats_prices() {
        let line = CartLine {
            product_id: ProductId::new(1),
            name: "Mug".to_owned(),
            unit_price: "2.5".parse().unwrap(),
            quantity: 3,
            description: None,
        };
        let view = CartView::new(&[line.clone()], line.line_total().unwrap(), 3);

        assert!(view.checkout_enabled);
        assert_eq!(view.subtotal, "$7.50");
        let item = &view.items[0];
        assert_eq!(item.price, "$2.50");
        assert_eq!(item.line_price, "$7.50");
        assert_eq!(item.quantity, 3);
    }
}
