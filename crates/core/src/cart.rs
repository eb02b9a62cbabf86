//! Cart line items and the rules for mutating a list of them.
//!
//! The functions here operate on a plain `Vec<LineItem>`; the storefront's
//! `CartStore` loads that vector from persistence, applies one of these rules
//! and writes it back.
//!
//! Invariants maintained by these rules:
//! - at most one line per product id (adding an existing product merges)
//! - every quantity is at least 1
//!
//! There is deliberately no clamp against stock here. Display layers use
//! [`LineItem::max_selectable`] to bound their quantity pickers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// Upper bound offered by quantity pickers regardless of stock.
pub const MAX_SELECTABLE_QUANTITY: u32 = 10;

/// One product-quantity pair inside a cart.
///
/// Field names on the wire match the layout stored under `cartItems`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "image")]
    pub image_ref: String,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    #[serde(rename = "qty")]
    pub quantity: u32,
    #[serde(rename = "countInStock", default, skip_serializing_if = "Option::is_none")]
    pub stock_limit: Option<u32>,
}

impl LineItem {
    /// Build a line for `product` with the given quantity.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image_ref: product.image.clone(),
            unit_price: product.price,
            quantity,
            stock_limit: Some(product.count_in_stock),
        }
    }

    /// `quantity × unit_price` at full precision.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Largest quantity a picker should offer: `min(stock, 10)`.
    #[must_use]
    pub fn max_selectable(&self) -> u32 {
        self.stock_limit
            .map_or(MAX_SELECTABLE_QUANTITY, |stock| stock.min(MAX_SELECTABLE_QUANTITY))
    }
}

/// Add `line` to `items`, merging into an existing line with the same
/// product id. Returns the resulting quantity of that product.
pub fn merge_add(items: &mut Vec<LineItem>, line: LineItem) -> u32 {
    if let Some(existing) = items.iter_mut().find(|i| i.product_id == line.product_id) {
        existing.quantity = existing.quantity.saturating_add(line.quantity);
        return existing.quantity;
    }

    let quantity = line.quantity;
    items.push(line);
    quantity
}

/// Remove the line for `product_id`. Returns whether a line was removed.
pub fn remove(items: &mut Vec<LineItem>, product_id: &ProductId) -> bool {
    let before = items.len();
    items.retain(|i| &i.product_id != product_id);
    items.len() != before
}

/// Overwrite the quantity of the line for `product_id`.
///
/// Returns whether a matching line existed. Does not check stock.
pub fn set_quantity(items: &mut [LineItem], product_id: &ProductId, quantity: u32) -> bool {
    let Some(line) = items.iter_mut().find(|i| &i.product_id == product_id) else {
        return false;
    };
    line.quantity = quantity;
    true
}

/// Sum of quantities across all lines.
#[must_use]
pub fn count(items: &[LineItem]) -> u64 {
    items.iter().map(|i| u64::from(i.quantity)).sum()
}

/// Sum of line totals at full precision.
#[must_use]
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}
