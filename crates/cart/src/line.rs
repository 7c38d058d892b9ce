//! Cart line type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storecart_core::{Price, Product, ProductId};

/// One product's entry in the cart.
///
/// Carries a snapshot of the product taken when it was first added, plus
/// the quantity. The quantity is never zero while the line is in a cart.
///
/// Field names on the wire match the persisted browser format
/// (`id`, `nombre`, `precio`, `descripcion`, `quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub unit_price: Price,
    pub quantity: u32,
    #[serde(
        rename = "descripcion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl CartLine {
    /// Snapshot `product` into a new line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            description: product.description.clone(),
        }
    }

    /// `unit_price × quantity`, or `None` if it exceeds the decimal range.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Sums derived from a set of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) item_count: u64,
    pub(crate) total: Decimal,
}

impl Totals {
    /// Totals of `lines`, or `None` if any line total or the sum does not fit.
    pub(crate) fn compute(lines: &[CartLine]) -> Option<Self> {
        lines.iter().try_fold(Self::default(), |acc, line| acc.with(line))
    }

    /// These totals with `line` counted in.
    pub(crate) fn with(self, line: &CartLine) -> Option<Self> {
        Some(Self {
            item_count: self.item_count.checked_add(u64::from(line.quantity))?,
            total: self.total.checked_add(line.line_total()?)?,
        })
    }
}
