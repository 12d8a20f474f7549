//! # Engine Errors and Outcomes
//!
//! `ReceiptError` is what the coordinator's stages fail with internally;
//! `CreateReceiptOutcome` is what callers receive.
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stage        ReceiptError                 ErrorCode                    │
//! │  ──────────   ─────────────────────────    ───────────────────          │
//! │  Validating   Validation(CustomerNotFound,  NOT_FOUND                   │
//! │                 ProductsNotFound,                                       │
//! │                 SellerProfileUnavailable)                               │
//! │  Validating   Validation(anything else)     VALIDATION_ERROR            │
//! │  Rendering    Render(Stream/Layout/Aborted) RENDER_ERROR                │
//! │  Persisting   Persistence(DbError)          STORAGE_ERROR               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use tillslip_core::{CoreError, Receipt};
use tillslip_db::DbError;
use tillslip_render::RenderError;
use ts_rs::TS;

/// Where a receipt issue got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum GenerationStage {
    Validating,
    Rendering,
    Persisting,
    Done,
}

/// Failure of one receipt issue.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to store receipt: {0}")]
    Persistence(#[from] DbError),
}

impl ReceiptError {
    /// The stage that failed.
    pub fn stage(&self) -> GenerationStage {
        match self {
            ReceiptError::Validation(_) => GenerationStage::Validating,
            ReceiptError::Render(_) => GenerationStage::Rendering,
            ReceiptError::Persistence(_) => GenerationStage::Persisting,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ReceiptError::Validation(e) if e.is_not_found() => ErrorCode::NotFound,
            ReceiptError::Validation(_) => ErrorCode::ValidationError,
            ReceiptError::Render(_) => ErrorCode::RenderError,
            ReceiptError::Persistence(_) => ErrorCode::StorageError,
        }
    }
}

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing customer, products or seller profile.
    NotFound,

    /// Malformed request or a failed lookup.
    ValidationError,

    /// The document could not be produced.
    RenderError,

    /// The document exists but the record could not be stored.
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::RenderError => "RENDER_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
        }
    }
}

/// Result of `create_receipt`. Never an `Err`: failures are data.
///
/// ## Serialization
/// ```json
/// {
///   "success": false,
///   "errorCode": "NOT_FOUND",
///   "errorMessage": "Products not found: p-9",
///   "failedStage": "validating"
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceiptOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<GenerationStage>,
}

impl CreateReceiptOutcome {
    pub fn done(receipt: Receipt, document_location: String) -> Self {
        CreateReceiptOutcome {
            success: true,
            receipt: Some(receipt),
            document_location: Some(document_location),
            error_code: None,
            error_message: None,
            failed_stage: None,
        }
    }

    pub fn failed(error: &ReceiptError) -> Self {
        CreateReceiptOutcome {
            success: false,
            receipt: None,
            document_location: None,
            error_code: Some(error.code()),
            error_message: Some(error.to_string()),
            failed_stage: Some(error.stage()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let missing = ReceiptError::from(CoreError::ProductsNotFound(vec!["p-9".to_string()]));
        assert_eq!(missing.code(), ErrorCode::NotFound);
        assert_eq!(missing.stage(), GenerationStage::Validating);

        let empty = ReceiptError::from(CoreError::EmptyLineItems);
        assert_eq!(empty.code(), ErrorCode::ValidationError);

        let seller = ReceiptError::from(CoreError::SellerProfileUnavailable);
        assert_eq!(seller.code(), ErrorCode::NotFound);

        let lookup = ReceiptError::from(CoreError::Lookup("pool closed".to_string()));
        assert_eq!(lookup.code(), ErrorCode::ValidationError);

        let render = ReceiptError::from(RenderError::layout("too tall"));
        assert_eq!(render.code(), ErrorCode::RenderError);
        assert_eq!(render.stage(), GenerationStage::Rendering);

        let store = ReceiptError::from(DbError::Internal("gone".to_string()));
        assert_eq!(store.code(), ErrorCode::StorageError);
        assert_eq!(store.stage(), GenerationStage::Persisting);
    }

    #[test]
    fn test_failed_outcome_serialization() {
        let err = ReceiptError::from(CoreError::CustomerNotFound("c-9".to_string()));
        let json = serde_json::to_value(CreateReceiptOutcome::failed(&err)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["errorCode"], "NOT_FOUND");
        assert_eq!(json["failedStage"], "validating");
        assert!(json["errorMessage"].as_str().unwrap().contains("c-9"));
        assert!(json.get("receipt").is_none());
    }

    #[test]
    fn test_error_code_strings_match_serde() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::ValidationError,
            ErrorCode::RenderError,
            ErrorCode::StorageError,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, code.as_str());
        }
    }
}
