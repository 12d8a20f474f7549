//! # JSON File Receipt Store
//!
//! The whole receipt list lives in one JSON array file.
//!
//! ## Append Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append(receipt)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock write_lock (one appender per process)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  read receipts.json ──missing/blank──► []                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  push, serialize ──► receipts.json.tmp ──fsync──► rename over original  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A crash mid-write leaves the previous file intact. Two processes sharing
//! one file still race: the last rename wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tillslip_core::Receipt;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::store::ReceiptStore;

/// Receipt store backed by a single JSON array file.
#[derive(Debug)]
pub struct JsonFileReceiptStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileReceiptStore {
    /// Creates a store over `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileReceiptStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "receipts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_all(&self) -> DbResult<Vec<Receipt>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Receipt file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&raw)?)
    }

    async fn write_all(&self, receipts: &[Receipt]) -> DbResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let bytes = serde_json::to_vec_pretty(receipts)?;
        let tmp = self.temp_path();

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReceiptStore for JsonFileReceiptStore {
    async fn list(&self) -> DbResult<Vec<Receipt>> {
        self.read_all().await
    }

    async fn append(&self, receipt: &Receipt) -> DbResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut receipts = self.read_all().await?;
        receipts.push(receipt.clone());
        self.write_all(&receipts).await?;

        info!(
            receipt_id = %receipt.id,
            stored = receipts.len(),
            path = %self.path.display(),
            "Receipt appended to JSON store"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
