//! # Demo Catalog
//!
//! A seller profile, two customers and a handful of products, enough to
//! issue every kind of document from the command line.
//!
//! ```bash
//! tillslip seed
//! tillslip issue demo-request.json
//! ```
//!
//! Seeding upserts by id, so running it twice leaves the same catalog.

use tillslip_core::{Customer, CustomerType, Money, Product, SellerProfile};
use tillslip_db::{Database, DbResult};
use tracing::info;

/// `(id, name, description, price in cents, GST applicable)`
const PRODUCTS: &[(&str, &str, Option<&str>, i64, bool)] = &[
    ("flat-white", "Flat White", Some("Regular, full cream"), 550, true),
    ("long-black", "Long Black", None, 450, true),
    ("banana-bread", "Banana Bread", Some("Toasted, with butter"), 650, false),
    ("milk-2l", "Milk 2L", None, 399, false),
    ("coffee-beans-1kg", "House Blend Beans 1kg", Some("Whole bean"), 4200, true),
    ("espresso-machine", "Home Espresso Machine", None, 38900, true),
];

pub fn seller() -> SellerProfile {
    SellerProfile {
        name: "Corner Cafe".to_string(),
        address: "1 Main Street, Springfield NSW 2000".to_string(),
        business_number: "12 345 678 901".to_string(),
        email: "hello@cornercafe.example".to_string(),
        phone: Some("02 9999 0000".to_string()),
        logo_path: None,
    }
}

pub fn customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "walk-in".to_string(),
            customer_type: CustomerType::Individual,
            first_name: Some("Walk-in".to_string()),
            last_name: Some("Customer".to_string()),
            business_name: None,
            email: None,
            phone: None,
            address: None,
            business_number: None,
        },
        Customer {
            id: "acme".to_string(),
            customer_type: CustomerType::Business,
            first_name: Some("Jordan".to_string()),
            last_name: Some("Lee".to_string()),
            business_name: Some("Acme Consulting Pty Ltd".to_string()),
            email: Some("accounts@acme.example".to_string()),
            phone: None,
            address: Some("Level 4, 200 George Street, Sydney NSW 2000".to_string()),
            business_number: Some("98 765 432 109".to_string()),
        },
    ]
}

pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|(id, name, description, cents, gst)| Product {
            id: id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            unit_price: Money::from_cents(*cents),
            gst_applicable: *gst,
        })
        .collect()
}

/// Upserts the demo records. Returns `(customers, products)` written.
pub async fn seed(db: &Database) -> DbResult<(usize, usize)> {
    db.seller_profile().upsert(&seller()).await?;

    let customers = customers();
    for customer in &customers {
        db.customers().upsert(customer).await?;
    }

    let products = products();
    for product in &products {
        db.products().upsert(product).await?;
    }

    info!(
        customers = customers.len(),
        products = products.len(),
        "Demo catalog seeded"
    );

    Ok((customers.len(), products.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillslip_db::{DbConfig, ProductCatalog};

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(seed(&db).await.unwrap(), (2, PRODUCTS.len()));
        seed(&db).await.unwrap();

        assert_eq!(db.products().list().await.unwrap().len(), PRODUCTS.len());
        let machine = db.products().product_by_id("espresso-machine").await.unwrap();
        assert_eq!(machine.unwrap().unit_price, Money::from_cents(38900));
        assert_eq!(db.seller_profile().get().await.unwrap(), Some(seller()));
    }
}
