use crate::constants::TILE_NAME_REGEX_PATTERN;
use crate::credentials::Credentials;
use crate::downloader::DateWindow;
use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

static TILE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

/// Where a product lives on the remote data pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionParams {
    /// Base URL of the data pool host, e.g. `https://e4ftl01.cr.usgs.gov`
    pub url: String,
    /// Product folder relative to `url`, e.g. `MOLT/MOD11A1.061/`
    pub remote_path: String,
}

impl ConnectionParams {
    pub fn new(url: &str, remote_path: &str) -> Self {
        Self {
            url: url.to_string(),
            remote_path: remote_path.to_string(),
        }
    }

    /// Short product code taken from the last folder of `remote_path` (`MOD11A1.061`).
    pub fn product_code(&self) -> &str {
        self.remote_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Which tiles to fetch for every product of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileFilter {
    /// Every tile the remote folder offers
    All,
    /// Only the named tiles
    Only(BTreeSet<String>),
}

impl TileFilter {
    /// Parses a comma separated tile list such as `"h18v04,h18v05"`.
    ///
    /// `None` or a blank string selects [`TileFilter::All`].
    pub fn parse(tiles: Option<&str>) -> AppResult<Self> {
        match tiles.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(list) => Self::from_names(list.split(',')),
        }
    }

    /// Builds a filter from individual tile names, validating each as `hNNvNN`.
    ///
    /// Names are trimmed and lowercased; blank entries are ignored and an
    /// empty result selects [`TileFilter::All`].
    pub fn from_names<I, S>(names: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tile_regex = TILE_NAME_REGEX.get_or_init(|| {
            Regex::new(TILE_NAME_REGEX_PATTERN).expect("TILE_NAME_REGEX_PATTERN is a valid regex")
        });

        let mut tiles = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if !tile_regex.is_match(&name) {
                return Err(AppError::InvalidInput(format!(
                    "Tile must look like h18v04, got: {name}"
                )));
            }
            tiles.insert(name);
        }

        if tiles.is_empty() {
            Ok(Self::All)
        } else {
            Ok(Self::Only(tiles))
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn matches(&self, tile: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(tiles) => tiles.contains(tile),
        }
    }
}

impl fmt::Display for TileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(tiles) => {
                let joined: Vec<&str> = tiles.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}

/// Everything the transfer engine needs to fetch one product.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub product_id: String,
    pub connection: ConnectionParams,
    pub window: DateWindow,
    pub tiles: TileFilter,
    pub credentials: Credentials,
    pub destination: PathBuf,
}
