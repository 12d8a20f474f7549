//! # Generation Coordinator
//!
//! Issues one receipt: assemble, render the document, then record it.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create_receipt(request)                           │
//! │                                                                         │
//! │  Validating ── ReceiptAssembler::assemble ──► Err ─► Failed (no I/O)    │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Rendering ─── spawn_blocking {                                         │
//! │      │            sink = ArtifactStore::create(id)                      │
//! │      │            DocumentRenderer::render_pdf(receipt, sink)           │
//! │      │          }.await  ──► Err ─► remove artifact ─► Failed           │
//! │      ▼                                                                  │
//! │  Persisting ── ReceiptStore::append ──► Err ─► Failed (orphan logged)   │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Done ──► CreateReceiptOutcome { receipt, document_location }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A receipt is only appended after its document was completely written,
//! so the store never references a missing or half-written document.

use std::io::ErrorKind;
use std::sync::Arc;

use tillslip_core::{Receipt, ReceiptRequest, TaxPolicy};
use tillslip_db::{Database, DbResult, JsonFileReceiptStore, ReceiptStore};
use tillslip_render::{DocumentLabels, DocumentRenderer, RenderError, RenderResult, RenderStats};
use tracing::{debug, error, info, warn};

use crate::artifacts::{ArtifactStore, FileArtifactStore};
use crate::assembler::ReceiptAssembler;
use crate::config::{EngineConfig, StoreBackend};
use crate::error::{CreateReceiptOutcome, GenerationStage, ReceiptError};

/// Runs receipt issues against one set of collaborators.
#[derive(Clone)]
pub struct GenerationCoordinator {
    assembler: ReceiptAssembler,
    renderer: Arc<DocumentRenderer>,
    store: Arc<dyn ReceiptStore>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl GenerationCoordinator {
    pub fn new(
        assembler: ReceiptAssembler,
        renderer: DocumentRenderer,
        store: Arc<dyn ReceiptStore>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        GenerationCoordinator {
            assembler,
            renderer: Arc::new(renderer),
            store,
            artifacts,
        }
    }

    /// Wires the SQLite repositories for lookups, the configured record
    /// store and a [`FileArtifactStore`] under the data directory.
    pub fn from_database(config: &EngineConfig, db: &Database) -> Self {
        let assembler = ReceiptAssembler::new(
            Arc::new(db.customers()),
            Arc::new(db.products()),
            Arc::new(db.seller_profile()),
            TaxPolicy::new(config.tax),
        );

        let store: Arc<dyn ReceiptStore> = match config.store {
            StoreBackend::Json => Arc::new(JsonFileReceiptStore::new(config.receipts_path())),
            StoreBackend::Sqlite => Arc::new(db.receipts()),
        };

        info!(
            store = %config.store,
            data_dir = %config.data_dir.display(),
            "Generation coordinator ready"
        );

        GenerationCoordinator::new(
            assembler,
            DocumentRenderer::new(config.page.clone(), DocumentLabels::default()),
            store,
            Arc::new(FileArtifactStore::new(config.documents_dir())),
        )
    }

    /// Issues a receipt. Failures are reported in the outcome, never as
    /// `Err`.
    pub async fn create_receipt(&self, request: &ReceiptRequest) -> CreateReceiptOutcome {
        match self.issue(request).await {
            Ok((receipt, location)) => CreateReceiptOutcome::done(receipt, location),
            Err(e) => {
                debug!(
                    customer_id = %request.customer_id,
                    stage = ?e.stage(),
                    code = e.code().as_str(),
                    error = %e,
                    "Receipt not issued"
                );
                CreateReceiptOutcome::failed(&e)
            }
        }
    }

    async fn issue(&self, request: &ReceiptRequest) -> Result<(Receipt, String), ReceiptError> {
        debug!(stage = ?GenerationStage::Validating, customer_id = %request.customer_id, "Issuing receipt");
        let receipt = self.assembler.assemble(request).await?;

        debug!(stage = ?GenerationStage::Rendering, receipt_id = %receipt.id, "Rendering document");
        let stats = self.render(&receipt).await?;

        debug!(stage = ?GenerationStage::Persisting, receipt_id = %receipt.id, "Recording receipt");
        let location = self.artifacts.location(&receipt.id);
        if let Err(e) = self.store.append(&receipt).await {
            error!(
                receipt_id = %receipt.id,
                document = %location,
                error = %e,
                "Receipt document written but not recorded; orphaned artifact needs manual reconciliation"
            );
            return Err(e.into());
        }

        info!(
            stage = ?GenerationStage::Done,
            receipt_id = %receipt.id,
            receipt_number = %receipt.receipt_number,
            total = %receipt.total,
            tax_invoice = receipt.is_tax_invoice,
            pages = stats.pages,
            "Receipt issued"
        );

        Ok((receipt, location))
    }

    /// Renders into a fresh artifact on a blocking task. A failed render
    /// leaves no artifact behind.
    async fn render(&self, receipt: &Receipt) -> Result<RenderStats, ReceiptError> {
        let renderer = Arc::clone(&self.renderer);
        let artifacts = Arc::clone(&self.artifacts);
        let job = receipt.clone();

        let result = tokio::task::spawn_blocking(move || -> RenderResult<RenderStats> {
            let sink = artifacts.create(&job.id)?;
            renderer.render_pdf(&job, sink)
        })
        .await
        .unwrap_or_else(|join| Err(RenderError::Aborted(join.to_string())));

        match result {
            Ok(stats) => Ok(stats),
            Err(e) => {
                self.discard_artifact(&receipt.id);
                Err(e.into())
            }
        }
    }

    fn discard_artifact(&self, id: &str) {
        match self.artifacts.remove(id) {
            Ok(()) => debug!(receipt_id = %id, "Removed partial document"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(receipt_id = %id, error = %e, "Failed to remove partial document"),
        }
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// Location of a recorded receipt's document, if both exist.
    pub async fn document_location(&self, id: &str) -> Option<String> {
        if !self.is_recorded(id).await {
            return None;
        }

        self.artifacts
            .exists(id)
            .then(|| self.artifacts.location(id))
    }

    /// Bytes of a recorded receipt's document.
    pub async fn document_bytes(&self, id: &str) -> Option<Vec<u8>> {
        if !self.is_recorded(id).await {
            return None;
        }

        let artifacts = Arc::clone(&self.artifacts);
        let key = id.to_string();
        match tokio::task::spawn_blocking(move || artifacts.read(&key)).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                warn!(receipt_id = %id, error = %e, "Failed to read document");
                None
            }
            Err(e) => {
                warn!(receipt_id = %id, error = %e, "Document read task failed");
                None
            }
        }
    }

    /// Every recorded receipt in storage order.
    pub async fn list_receipts(&self) -> DbResult<Vec<Receipt>> {
        self.store.list().await
    }

    async fn is_recorded(&self, id: &str) -> bool {
        match self.store.find(id).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(receipt_id = %id, error = %e, "Receipt lookup failed");
                false
            }
        }
    }
}
