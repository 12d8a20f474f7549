//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::TempDir;
use tillslip_core::{
    Customer, CustomerType, LineRequest, Money, Product, Receipt, ReceiptRequest, SellerProfile,
    TaxPolicy,
};
use tillslip_db::{DbError, DbResult, InMemoryDirectory, JsonFileReceiptStore, ReceiptStore};
use tillslip_engine::{ArtifactStore, FileArtifactStore, GenerationCoordinator, ReceiptAssembler};
use tillslip_render::{DocumentRenderer, PageConfig};

pub const CUSTOMER_ID: &str = "c-ada";

pub fn product(id: &str, cents: i64, gst_applicable: bool) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        description: None,
        unit_price: Money::from_cents(cents),
        gst_applicable,
    }
}

pub fn seller() -> SellerProfile {
    SellerProfile {
        name: "Corner Cafe".to_string(),
        address: "1 Main St, Springfield".to_string(),
        business_number: "12 345 678 901".to_string(),
        email: "hello@corner.example".to_string(),
        phone: Some("02 9999 0000".to_string()),
        logo_path: None,
    }
}

pub fn customer() -> Customer {
    Customer {
        id: CUSTOMER_ID.to_string(),
        customer_type: CustomerType::Individual,
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        business_name: None,
        email: Some("ada@example.com".to_string()),
        phone: None,
        address: None,
        business_number: None,
    }
}

/// Catalog used by the scenario tests.
pub fn catalog() -> Vec<Product> {
    vec![
        product("p-700", 700, true),
        product("p-350-gst", 350, true),
        product("p-700-free", 700, false),
        product("p-10000-gst", 10000, true),
    ]
}

pub fn request(lines: &[(&str, i64)], apply_tax: bool, force_tax_invoice: bool) -> ReceiptRequest {
    ReceiptRequest {
        customer_id: CUSTOMER_ID.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        line_requests: lines
            .iter()
            .map(|(id, qty)| LineRequest::new(*id, *qty))
            .collect(),
        apply_tax,
        force_tax_invoice,
    }
}

pub fn directory() -> InMemoryDirectory {
    let dir = InMemoryDirectory::new();
    dir.insert_customer(customer());
    for p in catalog() {
        dir.insert_product(p);
    }
    dir.set_seller_profile(Some(seller()));
    dir
}

/// An engine over in-memory lookups, a JSON store and file artifacts in a
/// temporary directory.
pub struct Harness {
    pub tmp: TempDir,
    pub directory: InMemoryDirectory,
    pub store: Arc<JsonFileReceiptStore>,
    pub files: Arc<FileArtifactStore>,
    pub engine: GenerationCoordinator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(PageConfig::default(), |files| files, |store| store)
    }

    /// Builds a harness with the artifact and record stores optionally
    /// wrapped.
    pub fn with<A, S>(page: PageConfig, wrap_artifacts: A, wrap_store: S) -> Self
    where
        A: FnOnce(Arc<dyn ArtifactStore>) -> Arc<dyn ArtifactStore>,
        S: FnOnce(Arc<dyn ReceiptStore>) -> Arc<dyn ReceiptStore>,
    {
        let tmp = tempfile::tempdir().unwrap();
        let directory = directory();
        let store = Arc::new(JsonFileReceiptStore::new(tmp.path().join("receipts.json")));
        let files = Arc::new(FileArtifactStore::new(tmp.path().join("documents")));

        let shared = Arc::new(directory.clone());
        let record_store: Arc<dyn ReceiptStore> = store.clone();
        let artifact_store: Arc<dyn ArtifactStore> = files.clone();
        let engine = GenerationCoordinator::new(
            ReceiptAssembler::new(shared.clone(), shared.clone(), shared, TaxPolicy::default()),
            DocumentRenderer::new(page, Default::default()),
            wrap_store(record_store),
            wrap_artifacts(artifact_store),
        );

        Harness {
            tmp,
            directory,
            store,
            files,
            engine,
        }
    }

    /// Names of every file in the documents directory.
    pub fn document_files(&self) -> Vec<String> {
        match std::fs::read_dir(self.files.dir()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

// =============================================================================
// Failure Injection
// =============================================================================

/// Accepts `budget` bytes, then fails every write.
pub struct ShortSink {
    inner: Box<dyn Write + Send>,
    budget: usize,
}

impl Write for ShortSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.inner.write(&buf[..n])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// File artifacts whose sinks run out of space after `budget` bytes.
pub struct ShortArtifacts {
    pub inner: Arc<dyn ArtifactStore>,
    pub budget: usize,
}

impl ArtifactStore for ShortArtifacts {
    fn location(&self, id: &str) -> String {
        self.inner.location(id)
    }

    fn create(&self, id: &str) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(ShortSink {
            inner: self.inner.create(id)?,
            budget: self.budget,
        }))
    }

    fn remove(&self, id: &str) -> io::Result<()> {
        self.inner.remove(id)
    }

    fn exists(&self, id: &str) -> bool {
        self.inner.exists(id)
    }

    fn read(&self, id: &str) -> io::Result<Vec<u8>> {
        self.inner.read(id)
    }
}

/// A record store whose appends always fail.
pub struct RejectingStore;

#[async_trait]
impl ReceiptStore for RejectingStore {
    async fn list(&self) -> DbResult<Vec<Receipt>> {
        Ok(Vec::new())
    }

    async fn append(&self, _receipt: &Receipt) -> DbResult<()> {
        Err(DbError::QueryFailed("database is locked".to_string()))
    }
}
