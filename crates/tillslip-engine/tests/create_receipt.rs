//! End-to-end receipt issue through `GenerationCoordinator`.

mod common;

use std::collections::HashSet;

use common::{request, Harness};
use tillslip_core::Money;
use tillslip_db::ReceiptStore;
use tillslip_engine::{ErrorCode, GenerationStage};

fn cents(c: i64) -> Money {
    Money::from_cents(c)
}

#[tokio::test]
async fn test_untaxed_single_line() {
    let h = Harness::new();
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-700", 2)], false, false))
        .await;

    assert!(outcome.success);
    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.subtotal, cents(1400));
    assert_eq!(receipt.tax_amount, cents(0));
    assert_eq!(receipt.total, cents(1400));
    assert!(!receipt.is_tax_invoice);
}

#[tokio::test]
async fn test_mixed_gst_lines_below_threshold() {
    let h = Harness::new();
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-350-gst", 10), ("p-700-free", 5)], true, false))
        .await;

    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.subtotal, cents(7000));
    assert_eq!(receipt.tax_amount, cents(350));
    assert_eq!(receipt.total, cents(7350));
    assert!(!receipt.is_tax_invoice);
    assert_eq!(receipt.line_items[0].tax, cents(350));
    assert_eq!(receipt.line_items[1].tax, cents(0));
}

#[tokio::test]
async fn test_tax_invoice_above_threshold() {
    let h = Harness::new();
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-10000-gst", 1)], true, false))
        .await;

    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.subtotal, cents(10000));
    assert_eq!(receipt.tax_amount, cents(1000));
    assert_eq!(receipt.total, cents(11000));
    assert!(receipt.is_tax_invoice);
}

#[tokio::test]
async fn test_forced_tax_invoice_below_threshold() {
    let h = Harness::new();
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-350-gst", 1)], true, true))
        .await;

    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.total, cents(385));
    assert!(receipt.is_tax_invoice);
}

#[tokio::test]
async fn test_force_ignored_without_tax() {
    let h = Harness::new();
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-350-gst", 1)], false, true))
        .await;

    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.tax_amount, cents(0));
    assert_eq!(receipt.total, cents(350));
    assert!(!receipt.is_tax_invoice);
}

#[tokio::test]
async fn test_unknown_product_leaves_no_trace() {
    let h = Harness::new();
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-700", 1), ("p-ghost", 2)], true, false))
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_code, Some(ErrorCode::NotFound));
    assert_eq!(outcome.failed_stage, Some(GenerationStage::Validating));
    assert!(outcome.error_message.unwrap().contains("p-ghost"));
    assert!(outcome.receipt.is_none());

    assert!(h.store.list().await.unwrap().is_empty());
    assert!(h.document_files().is_empty());
}

#[tokio::test]
async fn test_validation_failures_are_structured() {
    let h = Harness::new();

    let empty = h.engine.create_receipt(&request(&[], true, false)).await;
    assert_eq!(empty.error_code, Some(ErrorCode::ValidationError));

    let zero = h
        .engine
        .create_receipt(&request(&[("p-700", 0)], true, false))
        .await;
    assert_eq!(zero.error_code, Some(ErrorCode::ValidationError));
    assert!(zero.error_message.unwrap().contains("p-700"));

    let mut unknown_customer = request(&[("p-700", 1)], true, false);
    unknown_customer.customer_id = "c-nobody".to_string();
    let outcome = h.engine.create_receipt(&unknown_customer).await;
    assert_eq!(outcome.error_code, Some(ErrorCode::NotFound));

    h.directory.set_seller_profile(None);
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-700", 1)], true, false))
        .await;
    assert_eq!(outcome.error_code, Some(ErrorCode::NotFound));

    assert!(h.engine.list_receipts().await.unwrap().is_empty());
    assert!(h.document_files().is_empty());
}

#[tokio::test]
async fn test_amount_overflow_is_validation_error() {
    let h = Harness::new();
    h.directory
        .insert_product(common::product("p-yacht", 10_000_000_000_000_000, true));

    let outcome = h
        .engine
        .create_receipt(&request(&[("p-700", 1), ("p-yacht", 1000)], true, false))
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_code, Some(ErrorCode::ValidationError));
    assert_eq!(outcome.failed_stage, Some(GenerationStage::Validating));
    assert!(outcome.error_message.unwrap().contains("p-yacht"));

    assert!(h.store.list().await.unwrap().is_empty());
    assert!(h.document_files().is_empty());
}

#[tokio::test]
async fn test_identical_requests_get_distinct_ids() {
    let h = Harness::new();
    let req = request(&[("p-700", 1)], true, false);

    let mut ids = HashSet::new();
    for _ in 0..3 {
        let outcome = h.engine.create_receipt(&req).await;
        ids.insert(outcome.receipt.unwrap().id);
    }

    assert_eq!(ids.len(), 3);
    assert_eq!(h.document_files().len(), 3);
}

#[tokio::test]
async fn test_store_lists_in_issue_order() {
    let h = Harness::new();

    let mut issued = Vec::new();
    for qty in 1..=4 {
        let outcome = h
            .engine
            .create_receipt(&request(&[("p-700", qty)], true, false))
            .await;
        issued.push(outcome.receipt.unwrap());
    }

    assert_eq!(h.engine.list_receipts().await.unwrap(), issued);
}

#[tokio::test]
async fn test_document_retrieval() {
    let h = Harness::new();
    let outcome = h
        .engine
        .create_receipt(&request(&[("p-10000-gst", 1)], true, false))
        .await;
    let receipt = outcome.receipt.unwrap();

    let location = outcome.document_location.unwrap();
    assert!(location.ends_with(&format!("{}.pdf", receipt.id)));
    assert_eq!(h.engine.document_location(&receipt.id).await, Some(location));

    let bytes = h.engine.document_bytes(&receipt.id).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("TAX INVOICE"));
    assert!(text.trim_end().ends_with("%%EOF"));

    assert_eq!(h.engine.document_location("no-such-receipt").await, None);
    assert_eq!(h.engine.document_bytes("no-such-receipt").await, None);
}

#[tokio::test]
async fn test_many_lines_produce_multi_page_document() {
    let h = Harness::new();
    let lines: Vec<(&str, i64)> = (0..120).map(|_| ("p-350-gst", 1)).collect();
    let outcome = h.engine.create_receipt(&request(&lines, true, false)).await;

    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.line_items.len(), 120);

    let bytes = h.engine.document_bytes(&receipt.id).await.unwrap();
    let text = String::from_utf8_lossy(&bytes);
    let pages = text.matches("/Type /Page ").count();
    assert!(pages > 1, "expected several pages, got {}", pages);
}
