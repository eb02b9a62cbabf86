//! Fashion Store Core - Shared domain types and pricing rules.
//!
//! This crate provides the types used across all Fashion Store components:
//! - `storefront` - Cart, wishlist and checkout services plus the HTTP surface
//! - `cli` - Terminal client over a local file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. Everything here is deterministic, which is what
//! lets the storefront re-derive checkout state on every request.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, products, users, payment methods
//! - [`cart`] - Line items and the merge-on-add rules
//! - [`address`] - Shipping address validation
//! - [`account`] - Registration form validation
//! - [`totals`] - Order total computation (shipping and tax rules)
//! - [`order`] - Order snapshots and their paid/delivered transitions
//! - [`checkout`] - Checkout step gating

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod address;
pub mod cart;
pub mod checkout;
pub mod order;
pub mod totals;
pub mod types;

pub use account::{MIN_PASSWORD_LEN, Registration, RegistrationForm};
pub use address::{FieldErrors, ShippingAddress, ShippingForm};
pub use cart::{LineItem, MAX_SELECTABLE_QUANTITY};
pub use checkout::{CheckoutState, CheckoutStep, StepAccess};
pub use order::{OrderDraft, OrderSnapshot};
pub use totals::OrderTotals;
pub use types::*;
