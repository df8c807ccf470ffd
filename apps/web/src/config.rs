//! # Application Configuration
//!
//! Settings for the web server, record store, output directories, sale
//! policy and invoice layout.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RXDESK_PORT=8080                                                   │
//! │     RXDESK_DB_PATH=/var/lib/rxdesk/medicine.db                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $RXDESK_CONFIG, or                                                 │
//! │     ~/.config/rxdesk/rxdesk.toml (Linux)                               │
//! │     ~/Library/Application Support/com.rxdesk.rxdesk/rxdesk.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8501
//!
//! [database]
//! path = "medicine.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//!
//! [output]
//! ledger_dir = "ledger"
//! invoice_dir = "invoices"
//!
//! [sales]
//! allow_negative_stock = false
//!
//! [invoice]
//! title = "Invoice Bill"
//! store_name = "Corner Pharmacy"
//! currency_symbol = "$"
//! paper_width = 48
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use rxdesk_db::DbConfig;
use rxdesk_sales::invoice::MIN_PAPER_WIDTH;
use rxdesk_sales::{InvoiceLayout, InvoiceRenderer, LedgerWriter, SalePolicy};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "RXDESK_CONFIG";

// =============================================================================
// Errors
// =============================================================================

/// Configuration load and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Default: 127.0.0.1 (local machine only)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, created if missing.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a request waits for a pooled connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("medicine.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Where ledger and invoice files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_ledger_dir")]
    pub ledger_dir: PathBuf,

    #[serde(default = "default_invoice_dir")]
    pub invoice_dir: PathBuf,
}

fn default_ledger_dir() -> PathBuf {
    PathBuf::from("ledger")
}

fn default_invoice_dir() -> PathBuf {
    PathBuf::from("invoices")
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            ledger_dir: default_ledger_dir(),
            invoice_dir: default_invoice_dir(),
        }
    }
}

/// Checkout rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSettings {
    /// Let a sale take stock below zero.
    #[serde(default)]
    pub allow_negative_stock: bool,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxDeskConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub sales: SalesSettings,

    /// Invoice text; every field falls back to the default layout.
    #[serde(default)]
    pub invoice: InvoiceLayout,
}

impl RxDeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, then `$RXDESK_CONFIG`, then the
    ///    platform config dir). A missing file is not an error.
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks values that would only fail later, at bind or checkout time.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr must not be empty".into()));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "database.connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.output.ledger_dir.as_os_str().is_empty() || self.output.invoice_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output directories must not be empty".into()));
        }

        if self.invoice.title.trim().is_empty() {
            return Err(ConfigError::Invalid("invoice.title must not be empty".into()));
        }

        if self.invoice.paper_width < MIN_PAPER_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "invoice.paper_width must be at least {}",
                MIN_PAPER_WIDTH
            )));
        }

        Ok(())
    }

    /// Applies `RXDESK_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("RXDESK_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("RXDESK_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(port = %port, "Ignoring invalid RXDESK_PORT"),
            }
        }

        if let Some(path) = lookup("RXDESK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("RXDESK_LEDGER_DIR") {
            self.output.ledger_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("RXDESK_INVOICE_DIR") {
            self.output.invoice_dir = PathBuf::from(dir);
        }

        if let Some(value) = lookup("RXDESK_ALLOW_NEGATIVE_STOCK") {
            match parse_bool(&value) {
                Some(allow) => self.sales.allow_negative_stock = allow,
                None => warn!(value = %value, "Ignoring invalid RXDESK_ALLOW_NEGATIVE_STOCK"),
            }
        }

        if let Some(name) = lookup("RXDESK_STORE_NAME") {
            self.invoice.store_name = name;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rxdesk", "rxdesk")
            .map(|dirs| dirs.config_dir().join("rxdesk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// `bind_addr:port`, ready for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
    }

    pub fn sale_policy(&self) -> SalePolicy {
        SalePolicy {
            allow_negative_stock: self.sales.allow_negative_stock,
        }
    }

    pub fn ledger_writer(&self) -> LedgerWriter {
        LedgerWriter::new(&self.output.ledger_dir)
    }

    pub fn invoice_renderer(&self) -> InvoiceRenderer {
        InvoiceRenderer::new(&self.output.invoice_dir, self.invoice.clone())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RxDeskConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8501");
        assert_eq!(config.database.path, PathBuf::from("medicine.db"));
        assert!(!config.sales.allow_negative_stock);
        assert_eq!(config.invoice.title, "Invoice Bill");
        assert_eq!(config.invoice.paper_width, 48);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RxDeskConfig::from_toml(
            r#"
            [server]
            port = 9000

            [sales]
            allow_negative_stock = true

            [invoice]
            store_name = "Corner Pharmacy"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert!(config.sale_policy().allow_negative_stock);
        assert_eq!(config.invoice.store_name, "Corner Pharmacy");
        assert_eq!(config.invoice.currency_symbol, "$");
        assert_eq!(config.output.ledger_dir, PathBuf::from("ledger"));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = RxDeskConfig::from_toml("[server]\nport = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RxDeskConfig::default();
        config.apply_overrides(lookup_from(&[
            ("RXDESK_BIND_ADDR", "0.0.0.0"),
            ("RXDESK_PORT", "8080"),
            ("RXDESK_DB_PATH", "/data/rx.db"),
            ("RXDESK_LEDGER_DIR", "/data/ledger"),
            ("RXDESK_INVOICE_DIR", "/data/invoices"),
            ("RXDESK_ALLOW_NEGATIVE_STOCK", "yes"),
            ("RXDESK_STORE_NAME", "Night Pharmacy"),
        ]));

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.db_config().database_path, PathBuf::from("/data/rx.db"));
        assert_eq!(config.ledger_writer().dir(), PathBuf::from("/data/ledger").as_path());
        assert_eq!(config.invoice_renderer().dir(), PathBuf::from("/data/invoices").as_path());
        assert!(config.sales.allow_negative_stock);
        assert_eq!(config.invoice.store_name, "Night Pharmacy");
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = RxDeskConfig::default();
        config.apply_overrides(lookup_from(&[
            ("RXDESK_PORT", "not-a-port"),
            ("RXDESK_ALLOW_NEGATIVE_STOCK", "maybe"),
        ]));

        assert_eq!(config, RxDeskConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = RxDeskConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = RxDeskConfig::default();
        config.database.connect_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = RxDeskConfig::default();
        config.invoice.paper_width = MIN_PAPER_WIDTH - 1;
        assert!(config.validate().is_err());

        let mut config = RxDeskConfig::default();
        config.invoice.title = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = RxDeskConfig::default();
        config.server.bind_addr = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rxdesk.toml");
        std::fs::write(
            &path,
            "[database]\npath = \"shop.db\"\nmax_connections = 2\nconnect_timeout_secs = 4\n",
        )
        .unwrap();

        let config = RxDeskConfig::load(Some(path)).unwrap();
        assert_eq!(config.database.max_connections, 2);

        let db = config.db_config();
        assert_eq!(db.max_connections, 2);
        assert_eq!(db.connect_timeout, Duration::from_secs(4));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rxdesk.toml");
        std::fs::write(&path, "[invoice]\npaper_width = 10\n").unwrap();

        assert!(matches!(
            RxDeskConfig::load(Some(path)),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&RxDeskConfig::default()).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[invoice]"));

        let back = RxDeskConfig::from_toml(&toml_str).unwrap();
        assert_eq!(back, RxDeskConfig::default());
    }
}
