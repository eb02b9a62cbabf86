//! Integration tests for catalog, cart and wishlist routes.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use fashion_store_integration_tests::TestClient;

// =============================================================================
// Health and Middleware Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let mut client = TestClient::new();

    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");

    let response = client.get("/health/ready").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["api"], "offline");
    assert!(response.body["banner"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let mut client = TestClient::new();
    let response = client.get("/health").await;
    let generated = response.header("x-request-id").unwrap();
    assert!(!generated.is_empty());
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[tokio::test]
async fn test_product_listing_uses_demo_catalog() {
    let mut client = TestClient::new();

    let response = client.get("/products").await;
    assert_eq!(response.status, StatusCode::OK);
    let products = response.body.as_array().unwrap();
    assert_eq!(products.len(), 8);

    let belt = products.iter().find(|p| p["id"] == "7").unwrap();
    assert_eq!(belt["inStock"], false);
    assert_eq!(belt["maxSelectable"], 0);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mut client = TestClient::new();
    let response = client.get("/products/999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart Tests
// =============================================================================

#[tokio::test]
async fn test_cart_add_merges_lines() {
    let mut client = TestClient::new();

    client
        .post("/cart/add", &json!({ "productId": "1", "quantity": 2 }))
        .await;
    let response = client
        .post("/cart/add", &json!({ "productId": "1", "quantity": 3 }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["items"][0]["quantity"], 5);
    assert_eq!(response.body["itemCount"], 5);
    assert_eq!(response.body["subtotalDisplay"], "Rs 6,495");
}

#[tokio::test]
async fn test_cart_update_remove_clear() {
    let mut client = TestClient::new();
    client
        .post("/cart/add", &json!({ "productId": "1" }))
        .await;
    client
        .post("/cart/add", &json!({ "productId": "4" }))
        .await;

    let response = client
        .post("/cart/update", &json!({ "productId": "4", "quantity": 4 }))
        .await;
    assert_eq!(response.body["itemCount"], 5);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));

    let response = client
        .post("/cart/remove", &json!({ "productId": "1" }))
        .await;
    assert_eq!(response.body["itemCount"], 4);

    // Removing an absent line still answers the cart
    let response = client
        .post("/cart/remove", &json!({ "productId": "1" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));

    client.post("/cart/clear", &json!({})).await;
    assert_eq!(client.get("/cart/count").await.body["count"], 0);
}

#[tokio::test]
async fn test_cart_rejects_zero_quantity() {
    let mut client = TestClient::new();
    let response = client
        .post("/cart/add", &json!({ "productId": "1", "quantity": 0 }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Wishlist Tests
// =============================================================================

#[tokio::test]
async fn test_wishlist_toggle_and_move_to_cart() {
    let mut client = TestClient::new();

    let response = client
        .post("/wishlist/toggle", &json!({ "productId": "5" }))
        .await;
    assert_eq!(response.body["inWishlist"], true);
    assert_eq!(response.body["count"], 1);

    let detail = client.get("/products/5").await;
    assert_eq!(detail.body["inWishlist"], true);

    let response = client
        .post("/wishlist/move-to-cart", &json!({ "productId": "5" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
    assert_eq!(response.body["itemCount"], 1);

    let response = client
        .post("/wishlist/toggle", &json!({ "productId": "5" }))
        .await;
    assert_eq!(response.body["inWishlist"], false);
    assert_eq!(client.get("/wishlist").await.body["count"], 0);
}

#[tokio::test]
async fn test_move_to_cart_requires_wishlist_entry() {
    let mut client = TestClient::new();
    let response = client
        .post("/wishlist/move-to-cart", &json!({ "productId": "5" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
