//! # Engine Configuration
//!
//! Settings the engine is built from, loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (applied by `apps/issuer` on top of this)
//! 2. Environment variables (`TILLSLIP_*`)
//! 3. Defaults (this file)
//!
//! ## Environment Variables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TILLSLIP_DATA_DIR               directory for store, db and documents  │
//! │  TILLSLIP_GST_RATE               percent, e.g. "10"                     │
//! │  TILLSLIP_TAX_INVOICE_THRESHOLD  dollars, e.g. "82.50"                  │
//! │  TILLSLIP_STORE                  "json" | "sqlite"                      │
//! │  TILLSLIP_PAGE_SIZE              "a4" | "letter" | "210x297"            │
//! │  TILLSLIP_REPEAT_TABLE_HEADER    "true" | "false" | "1" | "0"           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values that do not parse are ignored with a warning and the default is
//! kept.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use directories::ProjectDirs;
use tillslip_core::validation::validate_tax_rate_bps;
use tillslip_core::{Money, TaxConfig, TaxRate};
use tillslip_render::{PageConfig, PageSize};
use tracing::warn;

pub const ENV_DATA_DIR: &str = "TILLSLIP_DATA_DIR";
pub const ENV_GST_RATE: &str = "TILLSLIP_GST_RATE";
pub const ENV_TAX_INVOICE_THRESHOLD: &str = "TILLSLIP_TAX_INVOICE_THRESHOLD";
pub const ENV_STORE: &str = "TILLSLIP_STORE";
pub const ENV_PAGE_SIZE: &str = "TILLSLIP_PAGE_SIZE";
pub const ENV_REPEAT_TABLE_HEADER: &str = "TILLSLIP_REPEAT_TABLE_HEADER";

const RECEIPTS_FILE: &str = "receipts.json";
const DATABASE_FILE: &str = "tillslip.db";
const DOCUMENTS_DIR: &str = "documents";

/// Where issued receipts are recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// `receipts.json` in the data directory.
    #[default]
    Json,

    /// The `receipts` table of the SQLite database.
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StoreBackend::Json),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Json => write!(f, "json"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Everything needed to open a [`GenerationCoordinator`](crate::GenerationCoordinator).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root for the record store, database and document files.
    pub data_dir: PathBuf,

    /// GST rate and tax-invoice threshold.
    pub tax: TaxConfig,

    pub store: StoreBackend,

    /// Page geometry and layout options for rendered documents.
    pub page: PageConfig,
}

impl Default for EngineConfig {
    /// Platform data directory, 10% GST, $82.50 threshold, JSON store, A4.
    fn default() -> Self {
        EngineConfig {
            data_dir: default_data_dir(),
            tax: TaxConfig::default(),
            store: StoreBackend::default(),
            page: PageConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads defaults overridden by `TILLSLIP_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_GST_RATE) {
            match parse_gst_rate(&raw) {
                Some(rate) => config.tax.rate = rate,
                None => warn!(key = ENV_GST_RATE, value = %raw, "Ignoring invalid GST rate"),
            }
        }

        if let Some(raw) = lookup(ENV_TAX_INVOICE_THRESHOLD) {
            match parse_threshold(&raw) {
                Some(threshold) => config.tax.tax_invoice_threshold = threshold,
                None => {
                    warn!(key = ENV_TAX_INVOICE_THRESHOLD, value = %raw, "Ignoring invalid threshold")
                }
            }
        }

        if let Some(raw) = lookup(ENV_STORE) {
            match raw.parse::<StoreBackend>() {
                Ok(store) => config.store = store,
                Err(e) => warn!(key = ENV_STORE, error = %e, "Ignoring invalid store backend"),
            }
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            match PageSize::parse(&raw) {
                Some(size) => config.page.page_size = size,
                None => warn!(key = ENV_PAGE_SIZE, value = %raw, "Ignoring invalid page size"),
            }
        }

        if let Some(raw) = lookup(ENV_REPEAT_TABLE_HEADER) {
            match parse_bool(&raw) {
                Some(repeat) => config.page.repeat_table_header = repeat,
                None => {
                    warn!(key = ENV_REPEAT_TABLE_HEADER, value = %raw, "Ignoring invalid flag")
                }
            }
        }

        config
    }

    /// The JSON record store file.
    pub fn receipts_path(&self) -> PathBuf {
        self.data_dir.join(RECEIPTS_FILE)
    }

    /// The SQLite database holding the catalog (and receipts in sqlite mode).
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Directory of rendered documents.
    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join(DOCUMENTS_DIR)
    }
}

/// `~/.local/share/tillslip` on Linux, the platform equivalent elsewhere.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "tillslip", "tillslip")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("tillslip-data"))
}

/// Percent string to a rate, rejecting anything outside 0..=100.
pub fn parse_gst_rate(raw: &str) -> Option<TaxRate> {
    let pct: f64 = raw.trim().trim_end_matches('%').parse().ok()?;
    if !pct.is_finite() || pct < 0.0 {
        return None;
    }
    let rate = TaxRate::from_percentage(pct);
    validate_tax_rate_bps(rate.bps()).ok()?;
    Some(rate)
}

/// Dollar string to a non-negative amount.
pub fn parse_threshold(raw: &str) -> Option<Money> {
    Money::parse_decimal(raw).ok().filter(|m| !m.is_negative())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> EngineConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_vars(&[]);
        assert_eq!(config.tax.rate, TaxRate::GST);
        assert_eq!(config.tax.tax_invoice_threshold, Money::from_cents(8250));
        assert_eq!(config.store, StoreBackend::Json);
        assert!(!config.page.repeat_table_header);
    }

    #[test]
    fn test_env_overrides() {
        let config = from_vars(&[
            (ENV_DATA_DIR, "/tmp/tillslip-test"),
            (ENV_GST_RATE, "15"),
            (ENV_TAX_INVOICE_THRESHOLD, "100.00"),
            (ENV_STORE, "SQLite"),
            (ENV_PAGE_SIZE, "letter"),
            (ENV_REPEAT_TABLE_HEADER, "yes"),
        ]);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/tillslip-test"));
        assert_eq!(config.tax.rate.bps(), 1500);
        assert_eq!(config.tax.tax_invoice_threshold, Money::from_cents(10000));
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.page.page_size, PageSize::Letter);
        assert!(config.page.repeat_table_header);
        assert_eq!(
            config.receipts_path(),
            PathBuf::from("/tmp/tillslip-test/receipts.json")
        );
        assert_eq!(
            config.documents_dir(),
            PathBuf::from("/tmp/tillslip-test/documents")
        );
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = from_vars(&[
            (ENV_GST_RATE, "-5"),
            (ENV_TAX_INVOICE_THRESHOLD, "lots"),
            (ENV_STORE, "postgres"),
            (ENV_REPEAT_TABLE_HEADER, "maybe"),
        ]);

        assert_eq!(config.tax, TaxConfig::default());
        assert_eq!(config.store, StoreBackend::Json);
        assert!(!config.page.repeat_table_header);
    }

    #[test]
    fn test_parse_gst_rate() {
        assert_eq!(parse_gst_rate("10").map(|r| r.bps()), Some(1000));
        assert_eq!(parse_gst_rate("12.5%").map(|r| r.bps()), Some(1250));
        assert_eq!(parse_gst_rate("0").map(|r| r.bps()), Some(0));
        assert!(parse_gst_rate("101").is_none());
        assert!(parse_gst_rate("NaN").is_none());
    }

    #[test]
    fn test_store_backend_round_trip() {
        for backend in [StoreBackend::Json, StoreBackend::Sqlite] {
            assert_eq!(backend.to_string().parse::<StoreBackend>(), Ok(backend));
        }
    }
}
