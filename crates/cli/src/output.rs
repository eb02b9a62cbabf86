//! Plain-text rendering for command output.

use std::fmt::Write as _;

use fashion_store_core::{
    CheckoutState, CheckoutStep, LineItem, OrderSnapshot, OrderTotals, Price, Product, UserInfo,
    cart,
};

/// Print command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}

fn money(amount: rust_decimal::Decimal) -> String {
    Price::inr(amount).display()
}

/// One row per product.
pub fn products(products: &[Product]) -> String {
    let mut out = String::new();
    for product in products {
        let stock = if product.in_stock() {
            format!("{} in stock", product.count_in_stock)
        } else {
            "out of stock".to_string()
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:>12}  {}",
            product.id,
            product.name,
            money(product.price),
            stock
        );
    }
    out.trim_end().to_string()
}

/// Product detail.
pub fn product(product: &Product, wishlisted: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    let _ = writeln!(out, "{} / {}", product.brand, product.category);
    let _ = writeln!(out, "Price: {}", money(product.price));
    let _ = writeln!(
        out,
        "Rating: {:.1} ({} reviews)",
        product.rating, product.num_reviews
    );
    let _ = writeln!(out, "Stock: {}", product.count_in_stock);
    if wishlisted {
        let _ = writeln!(out, "In your wishlist");
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    out.trim_end().to_string()
}

/// Cart lines with count and subtotal.
pub fn cart(items: &[LineItem]) -> String {
    if items.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:>3} x {:>12} = {:>12}",
            item.product_id,
            item.name,
            item.quantity,
            money(item.unit_price),
            money(item.line_total())
        );
    }
    let _ = write!(
        out,
        "Subtotal ({} items): {}",
        cart::count(items),
        money(cart::subtotal(items))
    );
    out
}

/// Wishlisted products.
pub fn wishlist(entries: &[Product]) -> String {
    if entries.is_empty() {
        return "Your wishlist is empty".to_string();
    }
    products(entries)
}

/// Signed-in identity.
pub fn user(user: Option<&UserInfo>) -> String {
    match user {
        Some(user) if user.is_demo() => format!("{} <{}> (demo)", user.name, user.email),
        Some(user) => format!("{} <{}>", user.name, user.email),
        None => "Not signed in".to_string(),
    }
}

/// Checkout step progress.
pub fn steps(state: &CheckoutState) -> String {
    let mut out = String::new();
    for step in CheckoutStep::ALL {
        let mark = if state.is_enabled(step) { "x" } else { " " };
        let _ = writeln!(out, "[{mark}] {}", step.label());
    }
    let _ = write!(
        out,
        "Next: {} ({}%)",
        state.next_required_step().label(),
        state.progress_percent()
    );
    out
}

/// Totals block shared by the summary and order views.
pub fn totals(totals: &OrderTotals) -> String {
    format!(
        "Items:    {:>12}\nShipping: {:>12}\nTax:      {:>12}\nTotal:    {:>12}",
        money(totals.items_total),
        money(totals.shipping_total),
        money(totals.tax_total),
        money(totals.grand_total)
    )
}

/// Order detail.
pub fn order(order: &OrderSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {}", order.id);
    let _ = writeln!(out, "Placed: {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "Ship to: {}", order.draft.shipping_address.one_line());
    let _ = writeln!(out, "Payment: {}", order.draft.payment_method.label());
    let _ = writeln!(
        out,
        "Paid: {}",
        order
            .paid_at()
            .map_or_else(|| "no".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
    );
    let _ = writeln!(
        out,
        "Delivered: {}",
        order
            .delivered_at()
            .map_or_else(|| "no".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
    );
    let _ = writeln!(out, "\n{}\n", cart(order.items()));
    let _ = write!(out, "{}", totals(order.totals()));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use fashion_store_core::{ProductId, UserInfo};

    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            image_ref: String::new(),
            unit_price: Decimal::from(price),
            quantity,
            stock_limit: None,
        }
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart(&[]), "Your cart is empty");
    }

    #[test]
    fn test_cart_subtotal_line() {
        let text = cart(&[line("1", 100, 2), line("2", 50, 1)]);
        assert!(text.ends_with("Subtotal (3 items): Rs 250"), "{text}");
    }

    #[test]
    fn test_user_marks_demo() {
        assert!(user(Some(&UserInfo::demo(None))).ends_with("(demo)"));
        assert_eq!(user(None), "Not signed in");
    }

    #[test]
    fn test_steps_next() {
        let state = CheckoutState {
            authenticated: true,
            has_shipping_address: false,
            has_payment_method: false,
            cart_item_count: 1,
        };
        let text = steps(&state);
        assert!(text.starts_with("[x] Sign In"), "{text}");
        assert!(text.ends_with("Next: Shipping (50%)"), "{text}");
    }
}
