//! # Subcommands
//!
//! Each handler returns whether it succeeded; output goes to stdout, logs to
//! stderr.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tillslip_core::ReceiptRequest;
use tillslip_db::Database;
use tillslip_engine::GenerationCoordinator;
use tracing::debug;

use crate::seed;

/// Reads a request from a file, or stdin when the path is `-`.
pub fn read_request(path: &Path) -> Result<ReceiptRequest> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?
    };

    serde_json::from_str(&raw).context("request is not a valid receipt request")
}

pub async fn issue(engine: &GenerationCoordinator, request_path: &Path) -> Result<bool> {
    let request = read_request(request_path)?;
    debug!(customer_id = %request.customer_id, lines = request.line_requests.len(), "Request loaded");

    let outcome = engine.create_receipt(&request).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(outcome.success)
}

pub async fn list(engine: &GenerationCoordinator, json: bool) -> Result<bool> {
    let receipts = engine.list_receipts().await.context("failed to read receipts")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipts)?);
        return Ok(true);
    }

    for receipt in &receipts {
        println!(
            "{}  {}  {:<32}  {:>12}  {}",
            receipt.receipt_number,
            receipt.purchase_date,
            receipt.customer_snapshot.display_name(),
            receipt.total.to_string(),
            if receipt.is_tax_invoice { "TAX INVOICE" } else { "RECEIPT" },
        );
    }
    println!("{} receipt(s)", receipts.len());

    Ok(true)
}

pub async fn document(
    engine: &GenerationCoordinator,
    id: &str,
    out: Option<&Path>,
) -> Result<bool> {
    let Some(out) = out else {
        return Ok(match engine.document_location(id).await {
            Some(location) => {
                println!("{}", location);
                true
            }
            None => {
                eprintln!("No document for receipt {}", id);
                false
            }
        });
    };

    match engine.document_bytes(id).await {
        Some(bytes) => {
            std::fs::write(out, &bytes)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("{} ({} bytes)", out.display(), bytes.len());
            Ok(true)
        }
        None => {
            eprintln!("No document for receipt {}", id);
            Ok(false)
        }
    }
}

pub async fn seed_catalog(db: &Database) -> Result<bool> {
    let (customers, products) = seed::seed(db).await.context("failed to seed catalog")?;
    println!("Seeded seller profile, {} customers, {} products", customers, products);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_request_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{
                "customerId": "acme",
                "date": "2024-05-17",
                "lineRequests": [{ "productId": "flat-white", "quantity": 2 }]
            }"#,
        )
        .unwrap();

        let request = read_request(&path).unwrap();
        assert_eq!(request.customer_id, "acme");
        assert_eq!(request.line_requests.len(), 1);
        assert!(request.apply_tax);
        assert!(!request.force_tax_invoice);
    }

    #[test]
    fn test_read_request_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(&path, "{\"customerId\": 5}").unwrap();

        assert!(read_request(&path).is_err());
        assert!(read_request(&dir.path().join("missing.json")).is_err());
    }
}
