//! Fashion Store Storefront library.
//!
//! Shopper-side services over a keyed document store, plus the JSON HTTP
//! surface that serves them from a browser session.
//!
//! # Modules
//!
//! - [`storage`] - `DocumentStore` trait with memory, file and session backends
//! - [`events`] - `cart-updated` pub/sub channel
//! - [`cart`] / [`wishlist`] / [`identity`] - shopper state stores
//! - [`checkout`] - step gating and order placement
//! - [`services`] - store API clients with demo fallback
//! - [`routes`] / [`middleware`] / [`state`] - axum server

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod wishlist;

#[cfg(test)]
mod testing;
