//! # Collaborator Lookups
//!
//! Read-only contracts for the data the engine resolves a request against.
//! The records themselves are owned elsewhere; the engine only copies them
//! into snapshots.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CustomerDirectory     customer_by_id(id)   → Option<Customer>          │
//! │  ProductCatalog        product_by_id(id)    → Option<Product>           │
//! │  SellerProfileSource   seller_profile()     → Option<SellerProfile>     │
//! │                                                                         │
//! │  Ok(None)  = the record does not exist (a validation failure upstream)  │
//! │  Err(_)    = the backend failed                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use tillslip_core::{Customer, Product, SellerProfile};

use crate::error::DbResult;

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn customer_by_id(&self, id: &str) -> DbResult<Option<Customer>>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>>;
}

#[async_trait]
pub trait SellerProfileSource: Send + Sync {
    async fn seller_profile(&self) -> DbResult<Option<SellerProfile>>;
}

// =============================================================================
// In-Memory Directory
// =============================================================================

#[derive(Debug, Default)]
struct Records {
    customers: HashMap<String, Customer>,
    products: HashMap<String, Product>,
    seller: Option<SellerProfile>,
}

/// All three lookups over shared in-process maps.
///
/// Cloning shares the underlying records, so a test can keep a handle and
/// edit the data after handing a clone to the engine.
///
/// Every mutation is a single map insert or assignment, so the records stay
/// whole even if a holder of the lock panics. Reads and writes both carry on
/// past a poisoned lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    records: Arc<RwLock<Records>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_customer(&self, customer: Customer) {
        self.write().customers.insert(customer.id.clone(), customer);
    }

    pub fn insert_product(&self, product: Product) {
        self.write().products.insert(product.id.clone(), product);
    }

    pub fn set_seller_profile(&self, profile: Option<SellerProfile>) {
        self.write().seller = profile;
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&Records) -> T) -> DbResult<T> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&records))
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn customer_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        self.read(|r| r.customers.get(id).cloned())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryDirectory {
    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.read(|r| r.products.get(id).cloned())
    }
}

#[async_trait]
impl SellerProfileSource for InMemoryDirectory {
    async fn seller_profile(&self) -> DbResult<Option<SellerProfile>> {
        self.read(|r| r.seller.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillslip_core::{CustomerType, Money};

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "Croissant".to_string(),
            description: None,
            unit_price: Money::from_cents(450),
            gst_applicable: true,
        }
    }

    #[tokio::test]
    async fn test_lookups_hit_and_miss() {
        let dir = InMemoryDirectory::new();
        dir.insert_product(product("p-1"));
        dir.insert_customer(Customer {
            id: "c-1".to_string(),
            customer_type: CustomerType::Individual,
            first_name: Some("Ada".to_string()),
            last_name: None,
            business_name: None,
            email: None,
            phone: None,
            address: None,
            business_number: None,
        });

        assert!(dir.product_by_id("p-1").await.unwrap().is_some());
        assert!(dir.product_by_id("p-2").await.unwrap().is_none());
        assert!(dir.customer_by_id("c-1").await.unwrap().is_some());
        assert!(dir.seller_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let dir = InMemoryDirectory::new();
        let handle = dir.clone();

        handle.insert_product(product("p-9"));
        assert!(dir.product_by_id("p-9").await.unwrap().is_some());

        handle.set_seller_profile(None);
        assert!(dir.seller_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_writes_survive_poisoned_lock() {
        let dir = InMemoryDirectory::new();
        dir.insert_product(product("p-1"));

        let records = dir.records.clone();
        let crashed = std::thread::spawn(move || {
            let _guard = records.write().unwrap();
            panic!("writer crashed while holding the lock");
        })
        .join();
        assert!(crashed.is_err());
        assert!(dir.records.is_poisoned());

        dir.insert_product(product("p-2"));

        assert!(dir.product_by_id("p-1").await.unwrap().is_some());
        assert!(dir.product_by_id("p-2").await.unwrap().is_some());
    }
}
