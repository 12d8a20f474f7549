//! # Command Line
//!
//! Flags override the `TILLSLIP_*` environment, which overrides defaults.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use tillslip_engine::config::{parse_gst_rate, parse_threshold};
use tillslip_engine::{EngineConfig, StoreBackend};
use tillslip_render::PageSize;

#[derive(Debug, Parser)]
#[command(name = "tillslip", version, about = "Issue receipts and tax invoices")]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct EngineArgs {
    #[arg(
        long,
        value_name = "DIR",
        global = true,
        help = "Directory for the record store, database and documents"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(long, value_name = "PERCENT", global = true, help = "GST rate, e.g. 10")]
    pub gst_rate: Option<String>,

    #[arg(
        long,
        value_name = "DOLLARS",
        global = true,
        help = "Total at or above which a taxed sale is a tax invoice"
    )]
    pub tax_invoice_threshold: Option<String>,

    #[arg(
        long,
        value_name = "BACKEND",
        global = true,
        value_parser = clap::value_parser!(StoreBackend),
        help = "Record store: json or sqlite"
    )]
    pub store: Option<StoreBackend>,

    #[arg(
        long,
        value_name = "SIZE",
        global = true,
        help = "Paper size: a4, letter or <w>x<h> in mm"
    )]
    pub page_size: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Repeat the line-item header on continuation pages"
    )]
    pub repeat_table_header: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue a receipt from a JSON request file ("-" reads stdin).
    Issue {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },

    /// List issued receipts in issue order.
    List {
        #[arg(long, help = "Print full receipt JSON instead of a summary")]
        json: bool,
    },

    /// Print the document location of a receipt, or copy it out.
    Document {
        #[arg(value_name = "RECEIPT_ID")]
        id: String,

        #[arg(long, value_name = "FILE", help = "Write the document to FILE")]
        out: Option<PathBuf>,
    },

    /// Load a demo seller profile, customers and products into the catalog.
    Seed,
}

impl EngineArgs {
    /// Merges flags over `base`. Unlike environment values, a flag that
    /// does not parse is an error.
    pub fn apply(&self, mut base: EngineConfig) -> Result<EngineConfig> {
        if let Some(dir) = &self.data_dir {
            base.data_dir = dir.clone();
        }

        if let Some(raw) = &self.gst_rate {
            base.tax.rate = parse_gst_rate(raw)
                .ok_or_else(|| anyhow!("invalid --gst-rate '{}': expected 0-100", raw))?;
        }

        if let Some(raw) = &self.tax_invoice_threshold {
            base.tax.tax_invoice_threshold = parse_threshold(raw).ok_or_else(|| {
                anyhow!("invalid --tax-invoice-threshold '{}': expected dollars", raw)
            })?;
        }

        if let Some(store) = self.store {
            base.store = store;
        }

        if let Some(raw) = &self.page_size {
            base.page.page_size = PageSize::parse(raw)
                .ok_or_else(|| anyhow!("invalid --page-size '{}'", raw))?;
        }

        if self.repeat_table_header {
            base.page.repeat_table_header = true;
        }

        Ok(base)
    }
}
