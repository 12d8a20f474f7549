//! # Document Layout
//!
//! One top-to-bottom pass over a receipt with explicit pagination.
//!
//! ## Page Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         TAX INVOICE / RECEIPT                           │
//! │                                                                         │
//! │  From                               To                                  │
//! │  Seller name                        Customer display name               │
//! │  address, email, phone, ABN         email, phone, address, ABN          │
//! │                                                                         │
//! │  Receipt No.  RCT-20240517-5F2B8C1E                                     │
//! │  Reference    5f2b8c1e-...                                              │
//! │  Date         17/05/2024                                                │
//! │                                                                         │
//! │  Item                      [GST]   Qty   Unit Price   Line Total        │
//! │  ───────────────────────────────────────────────────────────────        │
//! │  Flat White                 Yes      2        $7.00       $14.00        │
//! │  ...                                                                    │
//! │  ───────────────────────────────────────────────────────────────        │
//! │                                          Subtotal         $14.00        │
//! │                                          GST               $1.40        │
//! │                                          ──────────────────────         │
//! │                                          Total            $15.40        │
//! │                                                                         │
//! │                      Thank you for your business.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pagination
//! Every section and every table row measures its height first. If it
//! would cross the bottom margin the page is closed and the cursor returns
//! to the top margin. Content taller than an empty page is a layout error.
//! The GST column appears only when tax was charged or the document is a
//! tax invoice.

use std::io::Write;

use chrono::NaiveDate;
use tillslip_core::{LineItem, Receipt};
use tracing::debug;

use crate::config::PageConfig;
use crate::error::{RenderError, RenderResult};
use crate::labels::DocumentLabels;
use crate::metrics::wrap_text;
use crate::pdf::PdfWriter;
use crate::writer::{DocumentWriter, PageGeometry, TextStyle};

/// Narrowest content area the table can be laid out in.
pub const MIN_CONTENT_WIDTH: f32 = 320.0;

const COLUMN_GAP: f32 = 18.0;
const CELL_PADDING: f32 = 6.0;
const GST_WIDTH: f32 = 40.0;
const QTY_WIDTH: f32 = 40.0;
const PRICE_WIDTH: f32 = 72.0;
const TOTALS_WIDTH: f32 = 220.0;
const ROW_PADDING: f32 = 4.0;
const RULE: f32 = 0.5;

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub pages: u32,
}

/// Lays receipts out onto any [`DocumentWriter`].
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    config: PageConfig,
    labels: DocumentLabels,
}

impl DocumentRenderer {
    pub fn new(config: PageConfig, labels: DocumentLabels) -> Self {
        DocumentRenderer { config, labels }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn labels(&self) -> &DocumentLabels {
        &self.labels
    }

    /// Renders `receipt` as a PDF into `sink`.
    pub fn render_pdf<W: Write>(&self, receipt: &Receipt, sink: W) -> RenderResult<RenderStats> {
        let mut writer = PdfWriter::new(sink, self.config.geometry())?;
        self.render(receipt, &mut writer)
    }

    /// Lays out `receipt` and finishes the writer.
    ///
    /// Returns only after `finish()` succeeded; any error leaves an
    /// incomplete document behind.
    pub fn render<D: DocumentWriter + ?Sized>(
        &self,
        receipt: &Receipt,
        writer: &mut D,
    ) -> RenderResult<RenderStats> {
        let geometry = writer.geometry();
        if geometry.content_width() < MIN_CONTENT_WIDTH {
            return Err(RenderError::layout(format!(
                "content area is {:.0}pt wide, at least {:.0}pt is needed",
                geometry.content_width(),
                MIN_CONTENT_WIDTH
            )));
        }

        debug!(
            receipt_id = %receipt.id,
            lines = receipt.line_items.len(),
            is_tax_invoice = receipt.is_tax_invoice,
            "Rendering document"
        );

        let mut layout = Layout {
            writer,
            geometry,
            config: &self.config,
            labels: &self.labels,
            y: geometry.margin_top,
            page: 1,
        };

        layout.title(receipt)?;
        layout.parties(receipt)?;
        layout.details(receipt)?;
        layout.table(receipt, &Columns::new(&geometry, receipt.shows_tax()))?;
        layout.totals(receipt)?;
        layout.footer()?;
        layout.writer.finish()?;

        debug!(receipt_id = %receipt.id, pages = layout.page, "Document rendered");
        Ok(RenderStats { pages: layout.page })
    }
}

// =============================================================================
// Table Columns
// =============================================================================

/// Horizontal positions of the line-item table, computed once per document.
#[derive(Debug, Clone, Copy)]
struct Columns {
    item_x: f32,
    item_width: f32,
    /// Left edge of the GST column, when shown.
    gst_x: Option<f32>,
    qty_right: f32,
    unit_right: f32,
    total_right: f32,
}

impl Columns {
    fn new(geometry: &PageGeometry, show_gst: bool) -> Self {
        let total_right = geometry.right_edge();
        let unit_right = total_right - PRICE_WIDTH;
        let qty_right = unit_right - PRICE_WIDTH;
        let qty_left = qty_right - QTY_WIDTH;

        let (gst_x, item_end) = if show_gst {
            (Some(qty_left - GST_WIDTH), qty_left - GST_WIDTH)
        } else {
            (None, qty_left)
        };

        Columns {
            item_x: geometry.margin_left,
            item_width: item_end - geometry.margin_left - CELL_PADDING,
            gst_x,
            qty_right,
            unit_right,
            total_right,
        }
    }
}

// =============================================================================
// Layout Pass
// =============================================================================

type Block = Vec<(String, TextStyle)>;

struct Layout<'a, D: DocumentWriter + ?Sized> {
    writer: &'a mut D,
    geometry: PageGeometry,
    config: &'a PageConfig,
    labels: &'a DocumentLabels,
    /// Top of the next free band, in points from the top edge.
    y: f32,
    page: u32,
}

impl<'a, D: DocumentWriter + ?Sized> Layout<'a, D> {
    fn body(&self) -> f32 {
        self.config.font_size
    }

    fn line_height(&self, size: f32) -> f32 {
        size * self.config.line_height
    }

    fn block_height(&self, block: &Block) -> f32 {
        block.iter().map(|(_, style)| self.line_height(style.size)).sum()
    }

    fn fits(&self, height: f32) -> bool {
        self.y + height <= self.geometry.bottom_limit()
    }

    fn break_page(&mut self, needed: f32, what: &str) -> RenderResult<()> {
        let usable = self.geometry.usable_height();
        if needed > usable {
            return Err(RenderError::layout(format!(
                "{} needs {:.0}pt but a page holds {:.0}pt",
                what, needed, usable
            )));
        }

        self.writer.new_page()?;
        self.page += 1;
        self.y = self.geometry.margin_top;
        debug!(page = self.page, section = what, "Page break");
        Ok(())
    }

    /// Starts a new page unless `needed` points fit below the cursor.
    fn reserve(&mut self, needed: f32, what: &str) -> RenderResult<()> {
        if !self.fits(needed) {
            self.break_page(needed, what)?;
        }
        Ok(())
    }

    /// Draws one line of text in the band starting at `top`.
    fn draw(&mut self, x: f32, top: f32, text: &str, style: TextStyle) -> RenderResult<()> {
        self.writer.text(x, top + style.size, text, style)
    }

    fn draw_right(&mut self, right: f32, top: f32, text: &str, style: TextStyle) -> RenderResult<()> {
        let width = self.writer.text_width(text, style);
        self.draw(right - width, top, text, style)
    }

    fn draw_centered(
        &mut self,
        left: f32,
        width: f32,
        top: f32,
        text: &str,
        style: TextStyle,
    ) -> RenderResult<()> {
        let text_width = self.writer.text_width(text, style);
        self.draw(left + ((width - text_width) / 2.0).max(0.0), top, text, style)
    }

    fn draw_block(&mut self, x: f32, top: f32, block: &Block) -> RenderResult<()> {
        let mut y = top;
        for (text, style) in block {
            self.draw(x, y, text, *style)?;
            y += self.line_height(style.size);
        }
        Ok(())
    }

    fn wrap_block(&self, entries: Vec<(String, TextStyle)>, width: f32) -> Block {
        entries
            .into_iter()
            .filter(|(text, _)| !text.trim().is_empty())
            .flat_map(|(text, style)| {
                wrap_text(&text, width, style)
                    .into_iter()
                    .map(move |line| (line, style))
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    fn title(&mut self, receipt: &Receipt) -> RenderResult<()> {
        let labels = self.labels;
        let style = TextStyle::bold(self.body() * 2.0);
        let height = self.line_height(style.size) + self.body();

        self.reserve(height, "title")?;
        let (left, width, top) = (self.geometry.margin_left, self.geometry.content_width(), self.y);
        self.draw_centered(left, width, top, labels.title(receipt.is_tax_invoice), style)?;
        self.y += height;
        Ok(())
    }

    fn parties(&mut self, receipt: &Receipt) -> RenderResult<()> {
        let labels = self.labels;
        let body = self.body();
        let heading = TextStyle::bold(body * 1.1);
        let name = TextStyle::bold(body);
        let regular = TextStyle::regular(body);
        let column_width = (self.geometry.content_width() - COLUMN_GAP) / 2.0;

        let seller = &receipt.seller_snapshot;
        let mut from = vec![
            (labels.from_heading.clone(), heading),
            (seller.name.clone(), name),
            (seller.address.clone(), regular),
            (seller.email.clone(), regular),
        ];
        if let Some(phone) = &seller.phone {
            from.push((format!("{}: {}", labels.phone, phone), regular));
        }
        from.push((
            format!("{}: {}", labels.business_number, seller.business_number),
            regular,
        ));

        let customer = &receipt.customer_snapshot;
        let mut to = vec![
            (labels.to_heading.clone(), heading),
            (customer.display_name(), name),
        ];
        if let Some(email) = &customer.email {
            to.push((email.clone(), regular));
        }
        if let Some(phone) = &customer.phone {
            to.push((format!("{}: {}", labels.phone, phone), regular));
        }
        if let Some(address) = &customer.address {
            to.push((address.clone(), regular));
        }
        if let Some(abn) = customer.business_number.as_deref().filter(|n| !n.trim().is_empty()) {
            to.push((format!("{}: {}", labels.business_number, abn), regular));
        }

        let from = self.wrap_block(from, column_width);
        let to = self.wrap_block(to, column_width);
        let height = self.block_height(&from).max(self.block_height(&to)) + body;

        self.reserve(height, "party details")?;
        let top = self.y;
        let left = self.geometry.margin_left;
        self.draw_block(left, top, &from)?;
        self.draw_block(left + column_width + COLUMN_GAP, top, &to)?;
        self.y += height;
        Ok(())
    }

    fn details(&mut self, receipt: &Receipt) -> RenderResult<()> {
        let labels = self.labels;
        let body = self.body();
        let label_style = TextStyle::bold(body);
        let value_style = TextStyle::regular(body);

        let rows = [
            (&labels.receipt_number, receipt.receipt_number.clone()),
            (&labels.receipt_id, receipt.id.clone()),
            (
                &labels.purchase_date,
                format_date(receipt.purchase_date, &labels.date_format)?,
            ),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| self.writer.text_width(label, label_style))
            .fold(0.0_f32, f32::max)
            + CELL_PADDING * 2.0;
        let row_height = self.line_height(body);
        let height = row_height * rows.len() as f32 + body;

        self.reserve(height, "receipt details")?;
        let left = self.geometry.margin_left;
        let mut top = self.y;
        for (label, value) in &rows {
            self.draw(left, top, label, label_style)?;
            self.draw(left + label_width, top, value, value_style)?;
            top += row_height;
        }
        self.y += height;
        Ok(())
    }

    fn table_header_height(&self) -> f32 {
        self.line_height(self.body()) + ROW_PADDING
    }

    fn table_header(&mut self, columns: &Columns) -> RenderResult<()> {
        let labels = self.labels;
        let style = TextStyle::bold(self.body());
        let top = self.y;

        self.draw(columns.item_x, top, &labels.item_column, style)?;
        if let Some(gst_x) = columns.gst_x {
            self.draw_centered(gst_x, GST_WIDTH, top, &labels.gst_column, style)?;
        }
        self.draw_right(columns.qty_right - CELL_PADDING, top, &labels.quantity_column, style)?;
        self.draw_right(columns.unit_right - CELL_PADDING, top, &labels.unit_price_column, style)?;
        self.draw_right(columns.total_right, top, &labels.line_total_column, style)?;

        let rule_y = top + self.line_height(style.size) + ROW_PADDING / 2.0;
        self.writer
            .line(columns.item_x, rule_y, columns.total_right, rule_y, RULE)?;

        self.y += self.table_header_height();
        Ok(())
    }

    fn row_block(&self, line: &LineItem, columns: &Columns) -> Block {
        let regular = TextStyle::regular(self.body());
        let small = TextStyle::regular(self.body() * 0.85);

        let mut entries = vec![(line.name.clone(), regular)];
        if let Some(description) = &line.description {
            entries.push((description.clone(), small));
        }

        let block = self.wrap_block(entries, columns.item_width);
        if block.is_empty() {
            vec![(String::new(), regular)]
        } else {
            block
        }
    }

    fn row(&mut self, line: &LineItem, block: &Block, columns: &Columns) -> RenderResult<()> {
        let labels = self.labels;
        let style = TextStyle::regular(self.body());
        let top = self.y;

        self.draw_block(columns.item_x, top, block)?;
        if let Some(gst_x) = columns.gst_x {
            self.draw_centered(gst_x, GST_WIDTH, top, labels.yes_no(line.gst_applicable), style)?;
        }
        self.draw_right(
            columns.qty_right - CELL_PADDING,
            top,
            &line.quantity.to_string(),
            style,
        )?;
        self.draw_right(
            columns.unit_right - CELL_PADDING,
            top,
            &line.unit_price.to_string(),
            style,
        )?;
        self.draw_right(columns.total_right, top, &line.line_total.to_string(), style)?;

        self.y += self.block_height(block) + ROW_PADDING;
        Ok(())
    }

    fn table(&mut self, receipt: &Receipt, columns: &Columns) -> RenderResult<()> {
        let header_height = self.table_header_height();
        let repeat_header = self.config.repeat_table_header;

        for (index, line) in receipt.line_items.iter().enumerate() {
            let block = self.row_block(line, columns);
            let row_height = self.block_height(&block) + ROW_PADDING;

            if index == 0 {
                // Header and first row stay together
                self.reserve(header_height + row_height, "table header")?;
                self.table_header(columns)?;
            } else if !self.fits(row_height) {
                let needed = if repeat_header {
                    header_height + row_height
                } else {
                    row_height
                };
                self.break_page(needed, "table row")?;
                if repeat_header {
                    self.table_header(columns)?;
                }
            }

            self.row(line, &block, columns)?;
        }

        self.reserve(ROW_PADDING, "table rule")?;
        let rule_y = self.y + ROW_PADDING / 2.0;
        self.writer
            .line(columns.item_x, rule_y, columns.total_right, rule_y, RULE)?;
        self.y += ROW_PADDING + self.body();
        Ok(())
    }

    fn totals(&mut self, receipt: &Receipt) -> RenderResult<()> {
        let labels = self.labels;
        let body = self.body();
        let regular = TextStyle::regular(body);
        let emphasized = TextStyle::bold(body * 1.3);

        let mut rows = vec![(&labels.subtotal, receipt.subtotal.to_string())];
        if receipt.shows_tax() {
            rows.push((&labels.gst_total, receipt.tax_amount.to_string()));
        }

        let row_height = self.line_height(body);
        let height = row_height * rows.len() as f32
            + ROW_PADDING * 2.0
            + self.line_height(emphasized.size)
            + body;

        self.reserve(height, "totals")?;
        let right = self.geometry.right_edge();
        let label_x = right - TOTALS_WIDTH.min(self.geometry.content_width());

        let mut top = self.y;
        for (label, value) in &rows {
            self.draw(label_x, top, label, regular)?;
            self.draw_right(right, top, value, regular)?;
            top += row_height;
        }

        let rule_y = top + ROW_PADDING / 2.0;
        self.writer.line(label_x, rule_y, right, rule_y, RULE * 2.0)?;
        top += ROW_PADDING * 2.0;

        self.draw(label_x, top, &labels.total, emphasized)?;
        self.draw_right(right, top, &receipt.total.to_string(), emphasized)?;

        self.y += height;
        Ok(())
    }

    fn footer(&mut self) -> RenderResult<()> {
        let labels = self.labels;
        if labels.footer.is_empty() {
            return Ok(());
        }

        let style = TextStyle::regular(self.body() * 0.9);
        let line_height = self.line_height(style.size);
        let height = line_height * labels.footer.len() as f32;

        self.reserve(height, "footer")?;
        let (left, width) = (self.geometry.margin_left, self.geometry.content_width());
        let mut top = self.y;
        for line in &labels.footer {
            self.draw_centered(left, width, top, line, style)?;
            top += line_height;
        }
        self.y += height;
        Ok(())
    }
}

fn format_date(date: NaiveDate, format: &str) -> RenderResult<String> {
    use std::fmt::Write as _;

    let mut out = String::new();
    write!(out, "{}", date.format(format))
        .map_err(|_| RenderError::layout(format!("invalid date format '{}'", format)))?;
    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================
