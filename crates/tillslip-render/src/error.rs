//! # Render Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RenderError                                                            │
//! │  ├── Stream   the sink rejected bytes (disk full, closed pipe, ...)     │
//! │  ├── Layout   the document cannot be built (content wider or taller     │
//! │  │            than an empty page, writer used after finish)             │
//! │  └── Aborted  the render task died before reporting                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the underlying sink failed.
    #[error("Document stream failed: {0}")]
    Stream(#[from] std::io::Error),

    /// The document could not be laid out.
    #[error("Document layout failed: {0}")]
    Layout(String),

    /// The rendering task panicked or was cancelled.
    #[error("Rendering aborted: {0}")]
    Aborted(String),
}

impl RenderError {
    pub fn layout(message: impl Into<String>) -> Self {
        RenderError::Layout(message.into())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
