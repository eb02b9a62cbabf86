//! Order total computation.
//!
//! Business rules:
//! - items total is the full-precision sum of line totals, rounded to 2 places
//! - shipping is free strictly above Rs 2000, otherwise a flat Rs 100
//! - tax is 15% of the rounded items total, rounded to 2 places
//! - grand total is the sum of the three rounded figures
//!
//! Rounding each published figure before summing keeps the grand total equal
//! to what a shopper can add up from the displayed lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{self, LineItem};
use crate::types::money;

/// Items total above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);

/// Flat shipping charge below the threshold.
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Tax rate applied to the items total (15%).
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// The four published totals of an order, each with exactly two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    #[serde(rename = "itemsPrice")]
    pub items_total: Decimal,
    #[serde(rename = "shippingPrice")]
    pub shipping_total: Decimal,
    #[serde(rename = "taxPrice")]
    pub tax_total: Decimal,
    #[serde(rename = "totalPrice")]
    pub grand_total: Decimal,
}

impl OrderTotals {
    /// Compute totals for the given cart lines. Pure and deterministic.
    #[must_use]
    pub fn compute(items: &[LineItem]) -> Self {
        Self::from_items_total(cart::subtotal(items))
    }

    /// Apply the shipping and tax rules to an items total.
    #[must_use]
    pub fn from_items_total(items_total: Decimal) -> Self {
        let items_total = money(items_total);
        let shipping_total = money(shipping_for(items_total));
        let tax_total = money(TAX_RATE * items_total);
        let grand_total = money(items_total + shipping_total + tax_total);

        Self {
            items_total,
            shipping_total,
            tax_total,
            grand_total,
        }
    }
}

/// Shipping charge for an already rounded items total.
#[must_use]
pub fn shipping_for(items_total: Decimal) -> Decimal {
    if items_total > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::ProductId;

    fn line(price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(format!("p-{price}-{quantity}")),
            name: "Linen Shirt".to_owned(),
            image_ref: "/images/shirt.jpg".to_owned(),
            unit_price: price,
            quantity,
            stock_limit: None,
        }
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let totals = OrderTotals::from_items_total(Decimal::new(2500, 0));
        assert_eq!(totals.shipping_total, Decimal::ZERO);
        assert_eq!(totals.shipping_total.to_string(), "0.00");
    }

    #[test]
    fn test_flat_shipping_below_threshold() {
        let totals = OrderTotals::from_items_total(Decimal::new(1500, 0));
        assert_eq!(totals.shipping_total.to_string(), "100.00");
    }

    #[test]
    fn test_threshold_itself_pays_shipping() {
        let totals = OrderTotals::from_items_total(Decimal::new(2000, 0));
        assert_eq!(totals.shipping_total.to_string(), "100.00");
    }

    #[test]
    fn test_tax_is_fifteen_percent() {
        let totals = OrderTotals::from_items_total(Decimal::new(1000, 0));
        assert_eq!(totals.tax_total.to_string(), "150.00");
        assert_eq!(totals.grand_total.to_string(), "1250.00");
    }

    #[test]
    fn test_sample_order_from_cart() {
        // 2 x 1299: free shipping, 389.70 tax
        let totals = OrderTotals::compute(&[line(Decimal::new(1299, 0), 2)]);
        assert_eq!(totals.items_total.to_string(), "2598.00");
        assert_eq!(totals.shipping_total.to_string(), "0.00");
        assert_eq!(totals.tax_total.to_string(), "389.70");
        assert_eq!(totals.grand_total.to_string(), "2987.70");
    }

    #[test]
    fn test_rounding_happens_per_figure() {
        // 3 x 33.335 = 100.005 -> 100.01; tax 15.0015 -> 15.00
        let totals = OrderTotals::compute(&[line(Decimal::new(33_335, 3), 3)]);
        assert_eq!(totals.items_total.to_string(), "100.01");
        assert_eq!(totals.tax_total.to_string(), "15.00");
        assert_eq!(totals.grand_total.to_string(), "215.01");
    }

    #[test]
    fn test_empty_cart() {
        let totals = OrderTotals::compute(&[]);
        assert_eq!(totals.items_total.to_string(), "0.00");
        assert_eq!(totals.shipping_total.to_string(), "100.00");
        assert_eq!(totals.grand_total.to_string(), "100.00");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(OrderTotals::from_items_total(Decimal::new(10, 0))).unwrap();
        assert_eq!(json["itemsPrice"], "10.00");
        assert_eq!(json["shippingPrice"], "100.00");
        assert_eq!(json["taxPrice"], "1.50");
        assert_eq!(json["totalPrice"], "111.50");
    }

    proptest! {
        #[test]
        fn prop_compute_is_deterministic(
            lines in proptest::collection::vec((1i64..500_000, 0u32..4, 1u32..10), 0..12)
        ) {
            let items: Vec<LineItem> = lines
                .iter()
                .map(|(mantissa, scale, qty)| line(Decimal::new(*mantissa, *scale), *qty))
                .collect();
            let first = serde_json::to_string(&OrderTotals::compute(&items)).unwrap();
            let second = serde_json::to_string(&OrderTotals::compute(&items)).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_grand_total_is_sum_of_parts(mantissa in 0i64..10_000_000, scale in 0u32..4) {
            let totals = OrderTotals::from_items_total(Decimal::new(mantissa, scale));
            prop_assert_eq!(
                totals.grand_total,
                totals.items_total + totals.shipping_total + totals.tax_total
            );
            prop_assert_eq!(totals.grand_total.scale(), 2);
        }
    }
}
