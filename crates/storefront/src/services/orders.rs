//! Order creation against the store API, with local synthesis in demo mode.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use fashion_store_core::{OrderDraft, OrderId, OrderSnapshot, UserInfo};

use super::{ServiceError, StoreApiClient};
use crate::checkout::OrderGateway;

/// Fields of the API's created-order response that the storefront keeps.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedOrder {
    #[serde(alias = "_id")]
    id: OrderId,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// [`OrderGateway`] backed by `POST /api/orders`.
#[derive(Clone)]
pub struct OrderClient {
    api: StoreApiClient,
    demo_delay: Duration,
}

impl OrderClient {
    /// `demo_delay` is how long a locally synthesized order takes to
    /// "complete", so demo checkouts behave like a network round trip.
    #[must_use]
    pub const fn new(api: StoreApiClient, demo_delay: Duration) -> Self {
        Self { api, demo_delay }
    }

    async fn synthesize(&self, draft: &OrderDraft) -> OrderSnapshot {
        tokio::time::sleep(self.demo_delay).await;
        OrderSnapshot::new(OrderId::generate(), draft.clone(), Utc::now())
    }
}

impl OrderGateway for OrderClient {
    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn create_order(
        &self,
        draft: &OrderDraft,
        user: &UserInfo,
    ) -> Result<OrderSnapshot, ServiceError> {
        if user.is_demo() || !self.api.is_configured() {
            return Ok(self.synthesize(draft).await);
        }

        match self
            .api
            .post_json::<_, CreatedOrder>(&["api", "orders"], draft, Some(&user.auth_token))
            .await
        {
            Ok(created) => {
                let created_at = created.created_at.unwrap_or_else(Utc::now);
                tracing::info!(order_id = %created.id, "Order created");
                Ok(OrderSnapshot::new(created.id, draft.clone(), created_at))
            }
            Err(e) if e.is_connectivity() => {
                tracing::warn!(error = %e, "Order API unreachable, creating order locally");
                Ok(self.synthesize(draft).await)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fashion_store_core::{LineItem, PaymentMethod, ShippingAddress};

    use super::*;
    use crate::testing::product;

    fn draft() -> OrderDraft {
        OrderDraft::new(
            vec![LineItem::from_product(&product("1", 1299, 5), 2)],
            ShippingAddress {
                address: "12 MG Road".to_owned(),
                city: "Pune".to_owned(),
                postal_code: "411001".to_owned(),
                country: "India".to_owned(),
            },
            PaymentMethod::CashOnDelivery,
        )
    }

    #[tokio::test]
    async fn test_offline_order_is_synthesized() {
        let client = OrderClient::new(StoreApiClient::offline(), Duration::ZERO);
        let order = client
            .create_order(&draft(), &UserInfo::demo(None))
            .await
            .unwrap();

        assert!(!order.is_paid());
        assert!(!order.is_delivered());
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.totals().grand_total.to_string(), "2987.70");
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_delay_is_applied() {
        let client = OrderClient::new(StoreApiClient::offline(), Duration::from_millis(2000));
        let started = tokio::time::Instant::now();
        client
            .create_order(&draft(), &UserInfo::demo(None))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }

    #[test]
    fn test_created_order_accepts_api_shape() {
        let created: CreatedOrder = serde_json::from_str(
            r#"{"_id":"65f1c0ffee","isPaid":false,"createdAt":"2026-01-15T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(created.id.as_str(), "65f1c0ffee");
        assert!(created.created_at.is_some());
    }
}
