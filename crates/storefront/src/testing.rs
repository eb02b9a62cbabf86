//! Shared test fixtures.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;
use serde_json::Value;

use fashion_store_core::{Product, ProductId, ShippingForm};

use crate::storage::{DocumentStore, MemoryStore, StorageError};

pub fn product(id: &str, price: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        image: format!("/images/{id}.jpg"),
        brand: "Fashion Co".to_owned(),
        category: "Shirts".to_owned(),
        description: String::new(),
        price: Decimal::new(price, 0),
        count_in_stock: stock,
        rating: 4.5,
        num_reviews: 12,
    }
}

pub fn shipping_form() -> ShippingForm {
    ShippingForm {
        address: "12 MG Road".to_owned(),
        city: "Pune".to_owned(),
        postal_code: "411001".to_owned(),
        country: "India".to_owned(),
    }
}

/// Memory store whose writes to selected keys fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: Mutex<HashSet<String>>,
    failing_flush: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `set`/`remove` of `key` fail.
    pub fn fail_on(&self, key: &str) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned());
    }

    /// Make every later `flush` fail.
    pub fn fail_flush(&self) {
        self.failing_flush.store(true, Ordering::SeqCst);
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        if self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
        {
            return Err(StorageError::Backend(format!("write to {key} refused")));
        }
        Ok(())
    }
}

impl DocumentStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.remove(key).await
    }

    async fn flush(&self) -> Result<(), StorageError> {
        if self.failing_flush.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("commit refused".to_owned()));
        }
        Ok(())
    }
}
