//! # Repository Module
//!
//! SQLite implementations of the receipt store and the collaborator lookups.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Engine                                                                 │
//! │       │                                                                 │
//! │       │  catalog.product_by_id("p-1")                                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── upsert(&self, product)                                             │
//! │  └── impl ProductCatalog                                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ReceiptRepository`](receipt::ReceiptRepository) - Append-only receipts (`ReceiptStore`)
//! - [`ProductRepository`](product::ProductRepository) - Catalog (`ProductCatalog`)
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers (`CustomerDirectory`)
//! - [`SellerProfileRepository`](seller::SellerProfileRepository) - Singleton seller profile

pub mod customer;
pub mod product;
pub mod receipt;
pub mod seller;
