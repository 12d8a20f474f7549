//! # tillslip-render: Document Layout and PDF Output
//!
//! Renders an issued [`Receipt`](tillslip_core::Receipt) into a paginated
//! printable document.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     tillslip-render (THIS CRATE)                        │
//! │                                                                         │
//! │   Receipt ──► DocumentRenderer ──► DocumentWriter ──► io::Write sink    │
//! │               (layout.rs)          (writer.rs)                          │
//! │               PageConfig           PdfWriter (pdf.rs)                   │
//! │               DocumentLabels       metrics.rs (Helvetica widths)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and does no filesystem work; the engine
//! opens the sink and runs the renderer on a blocking task.
//!
//! ## Usage
//! ```rust,ignore
//! use tillslip_render::{DocumentRenderer, PageConfig, DocumentLabels};
//!
//! let renderer = DocumentRenderer::new(PageConfig::default(), DocumentLabels::default());
//! let stats = renderer.render_pdf(&receipt, std::fs::File::create("r.pdf")?)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod labels;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod writer;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{Margin, PageConfig, PageSize};
pub use error::{RenderError, RenderResult};
pub use labels::DocumentLabels;
pub use layout::{DocumentRenderer, RenderStats};
pub use pdf::PdfWriter;
pub use writer::{DocumentWriter, FontWeight, PageGeometry, TextStyle};
