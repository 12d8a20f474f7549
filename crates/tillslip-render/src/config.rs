//! # Page Configuration
//!
//! Paper size, margins (both in millimetres) and typography for rendered
//! documents. [`PageConfig::geometry`] converts to PDF points.

use crate::writer::PageGeometry;

/// Points per millimetre (1 pt = 1/72 in).
pub const MM_TO_PT: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageSize {
    A4,
    Letter,
    Custom(f32, f32), // width, height in mm
}

impl PageSize {
    /// `(width, height)` in millimetres.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Custom(w, h) => (*w, *h),
        }
    }

    /// Parses `a4`, `letter` or `<w>x<h>` (millimetres).
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "a4" => Some(PageSize::A4),
            "letter" => Some(PageSize::Letter),
            other => {
                let (w, h) = other.split_once('x')?;
                let w: f32 = w.trim().parse().ok()?;
                let h: f32 = h.trim().parse().ok()?;
                (w > 0.0 && h > 0.0).then_some(PageSize::Custom(w, h))
            }
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Margin::uniform(18.0)
    }
}

impl Margin {
    pub fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Margin { top, bottom, left, right }
    }

    pub fn uniform(size: f32) -> Self {
        Margin {
            top: size,
            bottom: size,
            left: size,
            right: size,
        }
    }
}

/// Layout settings for one renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub page_size: PageSize,
    pub margin: Margin,
    /// Body text size in points. Headings scale from it.
    pub font_size: f32,
    /// Line pitch as a multiple of the font size.
    pub line_height: f32,
    /// Redraw the line-item column headers at the top of every
    /// continuation page.
    pub repeat_table_header: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            page_size: PageSize::A4,
            margin: Margin::default(),
            font_size: 10.0,
            line_height: 1.4,
            repeat_table_header: false,
        }
    }
}

impl PageConfig {
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::default()
    }

    /// Page dimensions and margins in points.
    pub fn geometry(&self) -> PageGeometry {
        let (w, h) = self.page_size.dimensions();
        PageGeometry {
            width: w * MM_TO_PT,
            height: h * MM_TO_PT,
            margin_top: self.margin.top * MM_TO_PT,
            margin_bottom: self.margin.bottom * MM_TO_PT,
            margin_left: self.margin.left * MM_TO_PT,
            margin_right: self.margin.right * MM_TO_PT,
        }
    }
}

#[derive(Debug, Default)]
pub struct PageConfigBuilder {
    page_size: Option<PageSize>,
    margin: Option<Margin>,
    font_size: Option<f32>,
    line_height: Option<f32>,
    repeat_table_header: Option<bool>,
}

impl PageConfigBuilder {
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn line_height(mut self, factor: f32) -> Self {
        self.line_height = Some(factor);
        self
    }

    pub fn repeat_table_header(mut self, repeat: bool) -> Self {
        self.repeat_table_header = Some(repeat);
        self
    }

    pub fn build(self) -> PageConfig {
        let default = PageConfig::default();
        PageConfig {
            page_size: self.page_size.unwrap_or(default.page_size),
            margin: self.margin.unwrap_or(default.margin),
            font_size: self.font_size.unwrap_or(default.font_size),
            line_height: self.line_height.unwrap_or(default.line_height),
            repeat_table_header: self.repeat_table_header.unwrap_or(default.repeat_table_header),
        }
    }
}
