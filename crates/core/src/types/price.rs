//! Type-safe price representation and display formatting.
//!
//! Amounts are kept at full decimal precision everywhere they are stored.
//! Rounding to two places happens only at the presentation boundary
//! ([`format_price`], [`format_amount`]) or when a total is published
//! ([`money`]).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a rupee price.
    #[must_use]
    pub const fn inr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::INR)
    }

    /// Format for display, e.g. `Rs 1,23,456.5`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", self.currency_code.symbol(), format_price(self.amount))
    }
}

/// ISO 4217 currency codes.
///
/// The store sells in a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    /// Display prefix used in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "Rs",
        }
    }
}

/// Round to two decimal places (half away from zero) with a fixed scale of 2.
///
/// `money(2598)` displays as `2598.00`, which is also its serialized form.
#[must_use]
pub fn money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Fixed two-decimal rendering without grouping (`2598` → `"2598.00"`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    money(amount).to_string()
}

/// Localized display string using Indian digit grouping.
///
/// At most two fraction digits are shown and trailing fractional zeros are
/// dropped: `2598` → `"2,598"`, `389.70` → `"389.7"`, `123456.789` →
/// `"1,23,456.79"`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();

    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(&group_indian(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Group an unsigned digit string as `xx,xx,xxx`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_groups_indian_style() {
        assert_eq!(format_price(Decimal::new(999, 0)), "999");
        assert_eq!(format_price(Decimal::new(2598, 0)), "2,598");
        assert_eq!(format_price(Decimal::new(123_456, 0)), "1,23,456");
        assert_eq!(format_price(Decimal::new(12_345_678, 0)), "1,23,45,678");
    }

    #[test]
    fn test_format_price_trims_fraction() {
        assert_eq!(format_price(Decimal::new(38970, 2)), "389.7");
        assert_eq!(format_price(Decimal::new(259_800, 2)), "2,598");
        assert_eq!(format_price(Decimal::new(1_234_567, 3)), "1,234.57");
    }

    #[test]
    fn test_format_price_negative_and_zero() {
        assert_eq!(format_price(Decimal::new(-150_000, 2)), "-1,500");
        assert_eq!(format_price(Decimal::ZERO), "0");
        assert_eq!(format_price(Decimal::new(-1, 3)), "0");
    }

    #[test]
    fn test_format_amount_fixed_two_places() {
        assert_eq!(format_amount(Decimal::new(2598, 0)), "2598.00");
        assert_eq!(format_amount(Decimal::new(3897, 1)), "389.70");
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
    }

    #[test]
    fn test_money_has_scale_two() {
        assert_eq!(money(Decimal::new(150, 0)).scale(), 2);
        assert_eq!(money(Decimal::new(150, 0)).to_string(), "150.00");
    }

    #[test]
    fn test_price_display() {
        let price = Price::inr(Decimal::new(129_900, 2));
        assert_eq!(price.display(), "Rs 1,299");
    }
}
