//! Order snapshots.
//!
//! An [`OrderSnapshot`] is assembled exactly once, when checkout completes.
//! After that the only permitted mutations are the paid and delivered
//! transitions, each of which stamps its timestamp the first time it runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::ShippingAddress;
use crate::cart::LineItem;
use crate::totals::OrderTotals;
use crate::types::{OrderId, PaymentMethod};

/// Everything needed to create an order, sent to the order collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub order_items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(flatten)]
    pub totals: OrderTotals,
}

impl OrderDraft {
    /// Assemble a draft, computing totals from the items.
    #[must_use]
    pub fn new(
        order_items: Vec<LineItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        let totals = OrderTotals::compute(&order_items);
        Self {
            order_items,
            shipping_address,
            payment_method,
            totals,
        }
    }
}

/// Immutable record of a placed order, persisted under `latestOrder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    #[serde(alias = "_id")]
    pub id: OrderId,
    #[serde(flatten)]
    pub draft: OrderDraft,
    pub created_at: DateTime<Utc>,
    is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paid_at: Option<DateTime<Utc>>,
    is_delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivered_at: Option<DateTime<Utc>>,
}

impl OrderSnapshot {
    /// Create an unpaid, undelivered order from a draft.
    #[must_use]
    pub const fn new(id: OrderId, draft: OrderDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            draft,
            created_at,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
        }
    }

    #[must_use]
    pub const fn totals(&self) -> &OrderTotals {
        &self.draft.totals
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.draft.order_items
    }

    #[must_use]
    pub const fn is_paid(&self) -> bool {
        self.is_paid
    }

    #[must_use]
    pub const fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        self.is_delivered
    }

    #[must_use]
    pub const fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    /// Transition to paid. Returns `false` if it already was.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_paid {
            return false;
        }
        self.is_paid = true;
        self.paid_at = Some(at);
        true
    }

    /// Transition to delivered. Returns `false` if it already was.
    pub fn mark_delivered(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_delivered {
            return false;
        }
        self.is_delivered = true;
        self.delivered_at = Some(at);
        true
    }
}
