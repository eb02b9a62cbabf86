//! Payment method selection.

use serde::{Deserialize, Serialize};

/// Payment method chosen during checkout.
///
/// Serialized with the values the client has always persisted under the
/// `paymentMethod` key, so previously stored selections keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// PayPal or a credit/debit card.
    #[default]
    #[serde(rename = "PayPal")]
    CardOrWallet,
    /// Stripe hosted payment.
    #[serde(rename = "Stripe")]
    AlternateGateway,
    /// Pay the courier on delivery.
    #[serde(rename = "CashOnDelivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// All selectable methods in display order.
    pub const ALL: [Self; 3] = [Self::CardOrWallet, Self::AlternateGateway, Self::CashOnDelivery];

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CardOrWallet => "PayPal or Credit Card",
            Self::AlternateGateway => "Stripe",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }

    /// Persisted code (`PayPal`, `Stripe`, `CashOnDelivery`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CardOrWallet => "PayPal",
            Self::AlternateGateway => "Stripe",
            Self::CashOnDelivery => "CashOnDelivery",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PayPal" | "paypal" | "card" => Ok(Self::CardOrWallet),
            "Stripe" | "stripe" => Ok(Self::AlternateGateway),
            "CashOnDelivery" | "cod" | "cash" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
