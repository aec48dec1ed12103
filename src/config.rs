use crate::constants::DEFAULT_PRODUCT;
use crate::errors::{AppError, AppResult};
use crate::models::ConnectionParams;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved transfer settings with all values filled in (no Options).
///
/// Used as-is by the `cli` subcommand and flattened into [`ResolvedConfigFile`]
/// for the `toml` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Maximum number of retry attempts for a failed file download
    pub max_retries: u32,
    /// Initial delay in milliseconds before the first retry
    pub retry_initial_delay_ms: u64,
    /// Maximum delay in milliseconds between retries
    pub retry_max_delay_ms: u64,
    /// Timeout for a single HTTP request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_initial_delay_ms: 1000,
            retry_max_delay_ms: 10000,
            request_timeout_secs: 120,
        }
    }
}

/// A complete download run described in a TOML file.
///
/// ```toml
/// setting = "/home/me/modis/settings.txt"
/// product = ["lst_terra_daily_1000", "lst_aqua_daily_1000"]
/// tiles = ["h18v04", "h18v05"]
/// startday = "2020-01-01"
/// endday = "2020-01-11"
/// max_retries = 5
///
/// [catalog.lst_terra_daily_1000]
/// url = "https://mirror.example.com"
/// remote_path = "MOLT/MOD11A1.061/"
/// ```
///
/// Unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    /// Path to the two-line credential file, or `-` to prompt
    pub setting: String,
    /// Products to download, in order
    #[serde(default = "default_products")]
    pub product: Vec<String>,
    /// Tiles to download; empty means all tiles
    #[serde(default)]
    pub tiles: Vec<String>,
    /// First date, `YYYY-MM-DD`
    pub startday: Option<String>,
    /// Last date, `YYYY-MM-DD`; requires `startday`
    pub endday: Option<String>,
    /// Destination folder; defaults to the folder of the settings file
    pub folder: Option<PathBuf>,
    /// Print only the artifact-list path per product
    #[serde(default)]
    pub list_only: bool,
    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
    /// Extra or replacement catalog entries keyed by product name
    #[serde(default)]
    pub catalog: BTreeMap<String, ConnectionParams>,
    /// Flattened transfer settings
    #[serde(flatten)]
    pub resolved: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates a run description from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, and `InvalidInput` if the TOML is
    /// malformed, `setting` is missing, unknown keys are present, the product list is
    /// empty, or `request_timeout_secs` is 0.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ResolvedConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        if config.product.iter().all(|p| p.trim().is_empty()) {
            return Err(AppError::InvalidInput(
                "At least one product is required".into(),
            ));
        }
        if config.resolved.request_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Request timeout must be greater than 0".into(),
            ));
        }

        Ok(config)
    }
}

fn default_products() -> Vec<String> {
    vec![DEFAULT_PRODUCT.to_string()]
}
