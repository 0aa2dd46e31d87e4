//! Product operations

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rescache_core::ResourceService;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{NewProduct, Product};

/// In-memory product service
#[derive(Debug, Default)]
pub struct ProductService {
    products: RwLock<HashMap<u64, Product>>,
    next_id: AtomicU64,
    backend_calls: AtomicU64,
}

impl ProductService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations that reached this service
    pub fn backend_calls(&self) -> u64 {
        self.backend_calls.load(Ordering::Relaxed)
    }

    pub fn count(&self) -> usize {
        self.products.read().len()
    }

    fn validate(product: &NewProduct) -> Result<(), StoreError> {
        if product.name.trim().is_empty() {
            return Err(StoreError::Validation("product name must not be empty".to_string()));
        }
        if product.price_cents < 0 {
            return Err(StoreError::Validation(format!(
                "price must not be negative: {}",
                product.price_cents
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceService for ProductService {
    type Id = u64;
    type Entity = Product;
    type Payload = NewProduct;
    type Error = StoreError;

    async fn find(&self, id: &u64) -> Result<Product, StoreError> {
        self.backend_calls.fetch_add(1, Ordering::Relaxed);
        self.products
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))
    }

    async fn create(&self, payload: NewProduct) -> Result<Product, StoreError> {
        self.backend_calls.fetch_add(1, Ordering::Relaxed);
        Self::validate(&payload)?;

        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = Product {
            id,
            name: payload.name,
            price_cents: payload.price_cents,
            stock: payload.stock,
            created_at: now,
            updated_at: now,
        };
        self.products.write().insert(id, product.clone());

        debug!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    async fn update(&self, id: &u64, payload: NewProduct) -> Result<Product, StoreError> {
        self.backend_calls.fetch_add(1, Ordering::Relaxed);
        Self::validate(&payload)?;

        let mut products = self.products.write();
        let product = products
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;
        product.name = payload.name;
        product.price_cents = payload.price_cents;
        product.stock = payload.stock;
        product.updated_at = Utc::now();

        debug!("Updated product {}", id);
        Ok(product.clone())
    }

    async fn delete(&self, id: &u64) -> Result<Product, StoreError> {
        self.backend_calls.fetch_add(1, Ordering::Relaxed);
        let removed = self
            .products
            .write()
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;

        debug!("Deleted product {}", id);
        Ok(removed)
    }
}
