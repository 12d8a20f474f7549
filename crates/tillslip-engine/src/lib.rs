//! # tillslip-engine: Receipt Generation Engine
//!
//! Validates a receipt request against the catalog, renders its document
//! and records it, in that order.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillslip Architecture                            │
//! │                                                                         │
//! │                         apps/issuer (CLI)                               │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ tillslip-engine (THIS CRATE)                     │   │
//! │  │                                                                  │   │
//! │  │  GenerationCoordinator                                           │   │
//! │  │     ├── ReceiptAssembler ──► lookups (tillslip-db)               │   │
//! │  │     ├── DocumentRenderer ──► ArtifactStore (<id>.pdf)            │   │
//! │  │     └── ReceiptStore     ──► JSON file or SQLite                 │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                     tillslip-core (money, tax, receipt)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! ```text
//! tillslip_engine/
//! ├── lib.rs          ◄─── You are here
//! ├── assembler.rs    ◄─── Request → priced Receipt
//! ├── coordinator.rs  ◄─── Render-then-persist flow, retrieval
//! ├── artifacts.rs    ◄─── Document files per receipt id
//! ├── config.rs       ◄─── EngineConfig from TILLSLIP_* variables
//! └── error.rs        ◄─── ReceiptError, ErrorCode, CreateReceiptOutcome
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = EngineConfig::from_env();
//! let db = Database::new(DbConfig::new(config.database_path())).await?;
//! let engine = GenerationCoordinator::from_database(&config, &db);
//!
//! let outcome = engine.create_receipt(&request).await;
//! if outcome.success {
//!     println!("{}", outcome.document_location.unwrap_or_default());
//! }
//! ```

pub mod artifacts;
pub mod assembler;
pub mod config;
pub mod coordinator;
pub mod error;

pub use artifacts::{ArtifactStore, FileArtifactStore};
pub use assembler::ReceiptAssembler;
pub use config::{EngineConfig, StoreBackend};
pub use coordinator::GenerationCoordinator;
pub use error::{CreateReceiptOutcome, ErrorCode, GenerationStage, ReceiptError};
