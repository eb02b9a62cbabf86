//! Catalog, cart and wishlist commands.

use fashion_store_core::ProductId;

use super::{CommandError, Context};
use crate::output;

pub async fn list_products(ctx: &Context) -> Result<String, CommandError> {
    let products = ctx.state().catalog().list_products().await?;
    Ok(output::products(&products))
}

pub async fn show_product(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let id = ProductId::new(id);
    let product = ctx.state().catalog().get_product(&id).await?;
    let wishlisted = ctx.wishlist().contains(&id).await?;
    Ok(output::product(&product, wishlisted))
}

pub async fn show_cart(ctx: &Context) -> Result<String, CommandError> {
    let items = ctx.cart().list().await?;
    Ok(output::cart(&items))
}

pub async fn add_to_cart(ctx: &Context, id: &str, quantity: u32) -> Result<String, CommandError> {
    let product = ctx
        .state()
        .catalog()
        .get_product(&ProductId::new(id))
        .await?;
    let items = ctx.cart().add(&product, quantity).await?;
    Ok(format!("Added {} to cart\n\n{}", product.name, output::cart(&items)))
}

pub async fn update_cart(ctx: &Context, id: &str, quantity: u32) -> Result<String, CommandError> {
    let items = ctx
        .cart()
        .set_quantity(&ProductId::new(id), quantity)
        .await?;
    Ok(output::cart(&items))
}

pub async fn remove_from_cart(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let items = ctx.cart().remove(&ProductId::new(id)).await?;
    Ok(output::cart(&items))
}

pub async fn clear_cart(ctx: &Context) -> Result<String, CommandError> {
    ctx.cart().clear().await?;
    Ok(output::cart(&[]))
}

pub async fn show_wishlist(ctx: &Context) -> Result<String, CommandError> {
    let entries = ctx.wishlist().list().await?;
    Ok(output::wishlist(&entries))
}

pub async fn toggle_wishlist(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let id = ProductId::new(id);
    let wishlist = ctx.wishlist();

    // Removing needs no catalog round trip
    if wishlist.contains(&id).await? {
        wishlist.remove(&id).await?;
        return Ok(format!("Removed {id} from wishlist"));
    }

    let product = ctx.state().catalog().get_product(&id).await?;
    wishlist.toggle(&product).await?;
    Ok(format!("Added {} to wishlist", product.name))
}

pub async fn remove_from_wishlist(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let entries = ctx.wishlist().remove(&ProductId::new(id)).await?;
    Ok(output::wishlist(&entries))
}

pub async fn move_to_cart(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let cart = ctx.cart();
    let items = ctx
        .wishlist()
        .move_to_cart(&ProductId::new(id), &cart)
        .await?;
    Ok(output::cart(&items))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::super::testing::context;
    use super::*;

    #[tokio::test]
    async fn test_cart_persists_across_contexts() {
        let (dir, ctx) = context().await;
        add_to_cart(&ctx, "1", 2).await.unwrap();
        add_to_cart(&ctx, "1", 1).await.unwrap();
        drop(ctx);

        let api = fashion_store_storefront::config::StoreApiConfig::default();
        let reopened = Context::with_api(dir.path(), &api).await.unwrap();
        let items = reopened.cart().list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_add_rejects_zero_quantity() {
        let (_dir, ctx) = context().await;
        assert!(matches!(
            add_to_cart(&ctx, "1", 0).await,
            Err(CommandError::Cart(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (_dir, ctx) = context().await;
        assert!(matches!(
            add_to_cart(&ctx, "999", 1).await,
            Err(CommandError::Service(_))
        ));
    }

    #[tokio::test]
    async fn test_wishlist_toggle_and_move() {
        let (_dir, ctx) = context().await;

        let text = toggle_wishlist(&ctx, "2").await.unwrap();
        assert_eq!(text, "Added Slim Fit Chinos to wishlist");

        let text = move_to_cart(&ctx, "2").await.unwrap();
        assert!(text.contains("Slim Fit Chinos"), "{text}");
        // Moving keeps the wishlist entry
        assert!(ctx.wishlist().contains(&ProductId::new("2")).await.unwrap());

        let text = toggle_wishlist(&ctx, "2").await.unwrap();
        assert_eq!(text, "Removed 2 from wishlist");
        assert_eq!(show_wishlist(&ctx).await.unwrap(), "Your wishlist is empty");
    }
}
