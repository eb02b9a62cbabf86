//! HTTP route handlers for storefront.
//!
//! Every handler answers JSON. Shopper state is scoped to the browser session
//! through [`SessionStore`](crate::storage::SessionStore); cart mutations add
//! an `HX-Trigger: cart-updated` header so badges can refresh.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Store API status and banner
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart lines and subtotal
//! POST /cart/add               - Add to cart (merges with an existing line)
//! POST /cart/update            - Set a line's quantity
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist entries
//! POST /wishlist/toggle        - Add or remove a product
//! POST /wishlist/remove        - Remove a product
//! POST /wishlist/move-to-cart  - Add one unit of a wishlisted product to the cart
//!
//! # Auth
//! GET  /login                  - Sign-in page (first checkout step)
//! POST /login                  - Same as POST /auth/login
//! GET  /auth/me                - Signed-in identity
//! POST /auth/login             - Sign in (credentials or demo)
//! POST /auth/register          - Create an account and sign in
//! POST /auth/logout            - Sign out
//!
//! # Checkout (pages redirect with 303 to the first unmet step)
//! GET  /checkout/steps         - Step progress
//! GET  /shipping               - Shipping form
//! POST /shipping               - Save shipping address
//! GET  /payment                - Payment options
//! POST /payment                - Save payment method
//! GET  /placeorder             - Order summary
//! POST /placeorder             - Place the order
//!
//! # Orders
//! GET  /order/{id}             - Order detail
//! POST /order/{id}/pay         - Mark paid
//! POST /order/{id}/deliver     - Mark delivered
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    http::{Request, Response},
    middleware::from_fn,
    response::AppendHeaders,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionManagerLayer;
use tracing::Span;

use crate::events::CART_UPDATED;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// `HX-Trigger` header announcing a cart change.
pub(crate) const fn cart_updated() -> AppendHeaders<[(&'static str, &'static str); 1]> {
    AppendHeaders([("HX-Trigger", CART_UPDATED)])
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(orders::show))
        .route("/{id}/pay", post(orders::pay))
        .route("/{id}/deliver", post(orders::deliver))
}

/// Create all routes for the storefront.
///
/// The caller supplies the session layer.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/auth", auth_routes())
        .route("/login", get(auth::login_page).post(auth::login))
        // Checkout steps
        .route("/checkout/steps", get(checkout::steps))
        .route(
            "/shipping",
            get(checkout::shipping_page).post(checkout::save_shipping),
        )
        .route(
            "/payment",
            get(checkout::payment_page).post(checkout::save_payment),
        )
        .route(
            "/placeorder",
            get(checkout::place_order_page).post(checkout::place_order),
        )
        .nest("/order", order_routes())
}

/// The full application: routes, session layer, request ids and tracing.
///
/// Sentry layers are added by the binary on top of this.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: tower_sessions::SessionStore + Clone,
{
    routes()
        .layer(sessions)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: std::time::Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}
