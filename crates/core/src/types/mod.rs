//! Core types for Fashion Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, format_amount, format_price, money};
pub use product::Product;
pub use status::PaymentMethod;
pub use user::UserInfo;
