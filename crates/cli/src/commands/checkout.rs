//! Checkout and order commands.
//!
//! Steps are gated exactly like the server's pages: a locked step fails with
//! the step that has to be completed first.

use fashion_store_core::{OrderId, PaymentMethod, ShippingForm};

use super::{CommandError, Context};
use crate::output;

pub async fn status(ctx: &Context) -> Result<String, CommandError> {
    let state = ctx.checkout().state().await?;
    Ok(output::steps(&state))
}

pub async fn save_shipping(ctx: &Context, form: &ShippingForm) -> Result<String, CommandError> {
    let address = ctx.checkout().save_shipping(form).await?;
    Ok(format!("Shipping to {}", address.one_line()))
}

pub async fn save_payment(ctx: &Context, method: PaymentMethod) -> Result<String, CommandError> {
    ctx.checkout().save_payment(method).await?;
    Ok(format!("Paying with {}", method.label()))
}

/// Everything the place-order step would show.
pub async fn summary(ctx: &Context) -> Result<String, CommandError> {
    let checkout = ctx.checkout();
    let (Some(address), Some(method)) = (
        checkout.shipping_address().await?,
        checkout.payment_method().await?,
    ) else {
        return status(ctx).await;
    };

    let items = ctx.cart().list().await?;
    let totals = checkout.totals().await?;

    Ok(format!(
        "{}\n\nShip to: {}\nPayment: {}\n\n{}",
        output::cart(&items),
        address.one_line(),
        method.label(),
        output::totals(&totals)
    ))
}

pub async fn place_order(ctx: &Context) -> Result<String, CommandError> {
    let order = ctx.checkout().place_order().await?;
    tracing::info!(order_id = %order.id, "Order placed");
    Ok(format!("Order placed\n\n{}", output::order(&order)))
}

/// Show an order; the latest one when `id` is `None`.
pub async fn show_order(ctx: &Context, id: Option<&str>) -> Result<String, CommandError> {
    let checkout = ctx.checkout();
    let order = match id {
        Some(id) => Some(checkout.order(&OrderId::new(id)).await?),
        None => checkout.latest_order().await?,
    };

    Ok(order.map_or_else(|| "No orders yet".to_string(), |order| output::order(&order)))
}

pub async fn pay_order(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let order = ctx.checkout().mark_paid(&OrderId::new(id)).await?;
    Ok(output::order(&order))
}

pub async fn deliver_order(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let order = ctx.checkout().mark_delivered(&OrderId::new(id)).await?;
    Ok(output::order(&order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fashion_store_core::CheckoutStep;
    use fashion_store_storefront::checkout::CheckoutError;

    use super::super::testing::context;
    use super::super::{account, shop};
    use super::*;

    fn form() -> ShippingForm {
        ShippingForm {
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            postal_code: "411001".to_string(),
            country: "India".to_string(),
        }
    }

    #[tokio::test]
    async fn test_shipping_locked_until_signed_in() {
        let (_dir, ctx) = context().await;
        let err = save_shipping(&ctx, &form()).await.unwrap_err();
        assert!(matches!(
            err,
            CommandError::Checkout(CheckoutError::StepLocked(CheckoutStep::SignIn))
        ));
    }

    #[tokio::test]
    async fn test_full_checkout() {
        let (_dir, ctx) = context().await;
        assert_eq!(show_order(&ctx, None).await.unwrap(), "No orders yet");

        shop::add_to_cart(&ctx, "1", 2).await.unwrap();
        account::login(&ctx, None, None, true).await.unwrap();
        save_shipping(&ctx, &form()).await.unwrap();
        save_payment(&ctx, PaymentMethod::CashOnDelivery)
            .await
            .unwrap();

        let text = summary(&ctx).await.unwrap();
        assert!(text.contains("Ship to: 12 MG Road"), "{text}");
        assert!(text.contains("Cash on Delivery"), "{text}");

        let order = ctx.checkout().place_order().await.unwrap();
        assert_eq!(ctx.cart().count().await.unwrap(), 0);

        let text = show_order(&ctx, None).await.unwrap();
        assert!(text.starts_with(&format!("Order {}", order.id)), "{text}");
        assert!(text.contains("Paid: no"), "{text}");

        let text = pay_order(&ctx, order.id.as_str()).await.unwrap();
        assert!(!text.contains("Paid: no"), "{text}");
        let text = deliver_order(&ctx, order.id.as_str()).await.unwrap();
        assert!(!text.contains("Delivered: no"), "{text}");
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let (_dir, ctx) = context().await;
        assert!(matches!(
            pay_order(&ctx, "missing").await,
            Err(CommandError::Checkout(CheckoutError::OrderNotFound(_)))
        ));
    }
}
