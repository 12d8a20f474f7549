//! # Document Labels
//!
//! Every fixed string printed on a document. Swap the struct to localize.

/// Static text used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLabels {
    pub tax_invoice_title: String,
    pub receipt_title: String,

    pub from_heading: String,
    pub to_heading: String,
    /// Prefix for business numbers, e.g. "ABN".
    pub business_number: String,
    pub phone: String,

    pub receipt_number: String,
    pub receipt_id: String,
    pub purchase_date: String,
    /// chrono format string for the purchase date.
    pub date_format: String,

    pub item_column: String,
    pub gst_column: String,
    pub quantity_column: String,
    pub unit_price_column: String,
    pub line_total_column: String,
    pub yes: String,
    pub no: String,

    pub subtotal: String,
    pub gst_total: String,
    pub total: String,

    pub footer: Vec<String>,
}

impl Default for DocumentLabels {
    fn default() -> Self {
        DocumentLabels {
            tax_invoice_title: "TAX INVOICE".to_string(),
            receipt_title: "RECEIPT".to_string(),
            from_heading: "From".to_string(),
            to_heading: "To".to_string(),
            business_number: "ABN".to_string(),
            phone: "Ph".to_string(),
            receipt_number: "Receipt No.".to_string(),
            receipt_id: "Reference".to_string(),
            purchase_date: "Date".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            item_column: "Item".to_string(),
            gst_column: "GST".to_string(),
            quantity_column: "Qty".to_string(),
            unit_price_column: "Unit Price".to_string(),
            line_total_column: "Line Total".to_string(),
            yes: "Yes".to_string(),
            no: "No".to_string(),
            subtotal: "Subtotal".to_string(),
            gst_total: "GST".to_string(),
            total: "Total".to_string(),
            footer: vec![
                "Thank you for your business.".to_string(),
                "Please keep this document for your records.".to_string(),
            ],
        }
    }
}

impl DocumentLabels {
    pub fn title(&self, is_tax_invoice: bool) -> &str {
        if is_tax_invoice {
            &self.tax_invoice_title
        } else {
            &self.receipt_title
        }
    }

    pub fn yes_no(&self, value: bool) -> &str {
        if value {
            &self.yes
        } else {
            &self.no
        }
    }
}
