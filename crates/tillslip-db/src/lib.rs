//! # tillslip-db: Record Store and Lookup Layer for Tillslip
//!
//! Persistence for issued receipts plus the collaborator lookups (customers,
//! products, seller profile) the engine resolves requests against.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillslip Data Flow                               │
//! │                                                                         │
//! │  GenerationCoordinator (tillslip-engine)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   tillslip-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐    │    │
//! │  │   │ ReceiptStore  │   │    Lookups     │   │   Database    │    │    │
//! │  │   │  (store.rs)   │   │  (lookup.rs)   │   │   (pool.rs)   │    │    │
//! │  │   │               │   │                │   │               │    │    │
//! │  │   │ JsonFile...   │   │ CustomerDir.   │   │ SqlitePool    │    │    │
//! │  │   │ ReceiptRepo   │   │ ProductCatalog │   │ Migrations    │    │    │
//! │  │   │               │   │ SellerProfile  │   │ Repositories  │    │    │
//! │  │   └───────────────┘   └────────────────┘   └───────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  receipts.json  or  tillslip.db (SQLite)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `ReceiptStore` contract
//! - [`json_store`] - Whole-file JSON receipt store
//! - [`lookup`] - Collaborator lookup contracts and the in-memory directory
//! - [`pool`] - SQLite connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite implementations of the store and lookups
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tillslip_db::{Database, DbConfig, ReceiptStore};
//!
//! let db = Database::new(DbConfig::new("path/to/tillslip.db")).await?;
//!
//! let receipts = db.receipts();
//! receipts.append(&receipt).await?;
//! let all = receipts.list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod json_store;
pub mod lookup;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use json_store::JsonFileReceiptStore;
pub use lookup::{CustomerDirectory, InMemoryDirectory, ProductCatalog, SellerProfileSource};
pub use pool::{Database, DbConfig};
pub use store::ReceiptStore;

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::receipt::ReceiptRepository;
pub use repository::seller::SellerProfileRepository;

/// The SQLite-backed receipt store.
pub type SqliteReceiptStore = ReceiptRepository;
