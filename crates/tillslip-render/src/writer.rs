//! # Drawing Primitives
//!
//! The seam between layout and output format.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DocumentRenderer (layout.rs)                                           │
//! │       │  text / line / new_page / finish                                │
//! │       ▼                                                                 │
//! │  DocumentWriter (trait)                                                 │
//! │       ├── PdfWriter<W: Write>   streams PDF to any sink                 │
//! │       └── (tests) recording writer                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Coordinates are in points measured from the top-left corner of the page,
//! y growing downwards. For `text`, `y` is the baseline. Writers convert to
//! their native coordinate system.

use crate::error::RenderResult;
use crate::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    /// Font size in points.
    pub size: f32,
}

impl TextStyle {
    pub fn regular(size: f32) -> Self {
        TextStyle {
            weight: FontWeight::Regular,
            size,
        }
    }

    pub fn bold(size: f32) -> Self {
        TextStyle {
            weight: FontWeight::Bold,
            size,
        }
    }
}

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_right
    }

    /// Lowest y any content may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// Vertical space available on an empty page.
    pub fn usable_height(&self) -> f32 {
        self.bottom_limit() - self.margin_top
    }
}

/// Output backend for the renderer.
///
/// A writer starts with one open page. Every method may fail; after an
/// error the document is incomplete and must be discarded.
pub trait DocumentWriter {
    fn geometry(&self) -> PageGeometry;

    /// Width of `text` in points.
    fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        metrics::text_width(text, style)
    }

    /// Draws `text` with its baseline starting at `(x, y)`.
    fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) -> RenderResult<()>;

    /// Draws a straight stroke.
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) -> RenderResult<()>;

    /// Closes the current page and opens a fresh one.
    fn new_page(&mut self) -> RenderResult<()>;

    /// Completes the document and flushes the sink. Nothing may be drawn
    /// afterwards.
    fn finish(&mut self) -> RenderResult<()>;
}
