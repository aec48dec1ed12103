use crate::constants::{DATE_DIR_REGEX_PATTERN, LISTING_LINK_SELECTOR, TILE_FILE_REGEX_PATTERN};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use url::Url;

/// Cached selector for every link of a directory listing.
static LINK_SELECTOR: OnceLock<Selector> = OnceLock::new();

/// Cached regex for `YYYY.MM.DD/` acquisition folders.
static DATE_DIR_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for HDF tiles and their XML metadata.
static TILE_FILE_REGEX: OnceLock<Regex> = OnceLock::new();

/// A downloadable file found in an acquisition folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// File name, e.g. `MOD11A1.A2020001.h18v04.061.2020009123456.hdf`
    pub name: String,
    /// Tile component of the name, e.g. `h18v04`
    pub tile: String,
    pub url: Url,
}

impl RemoteFile {
    /// `true` for the data file itself, `false` for its `.xml` metadata.
    pub fn is_hdf(&self) -> bool {
        self.name.ends_with(".hdf")
    }
}

fn link_targets<'a>(document: &'a Html, base_url: &'a Url) -> impl Iterator<Item = Url> + 'a {
    let selector = LINK_SELECTOR.get_or_init(|| {
        Selector::parse(LISTING_LINK_SELECTOR).expect("LISTING_LINK_SELECTOR is a valid CSS selector")
    });

    document
        .select(selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(move |href| base_url.join(href).ok())
}

fn last_segment(url: &Url) -> Option<&str> {
    url.path_segments()?.filter(|s| !s.is_empty()).next_back()
}

/// Extracts the acquisition folders of a product listing.
///
/// Keys are the folder dates; values are absolute folder URLs ending in `/`.
/// Links that are not `YYYY.MM.DD` folders, or name an impossible date, are skipped.
pub fn parse_date_dirs(html: &str, base_url: &Url) -> BTreeMap<NaiveDate, Url> {
    let document = Html::parse_document(html);
    let date_regex = DATE_DIR_REGEX.get_or_init(|| {
        Regex::new(DATE_DIR_REGEX_PATTERN).expect("DATE_DIR_REGEX_PATTERN is a valid regex pattern")
    });

    let mut dirs = BTreeMap::new();
    for url in link_targets(&document, base_url) {
        let Some(name) = last_segment(&url) else {
            continue;
        };
        let Some(caps) = date_regex.captures(name) else {
            continue;
        };
        let year: Option<i32> = caps[1].parse().ok();
        let month: Option<u32> = caps[2].parse().ok();
        let day: Option<u32> = caps[3].parse().ok();
        let date = match (year, month, day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
            _ => None,
        };
        if let (Some(date), Ok(dir_url)) = (date, base_url.join(&format!("{name}/"))) {
            dirs.insert(date, dir_url);
        }
    }
    dirs
}

/// Extracts the HDF files (and their `.hdf.xml` metadata) of an acquisition folder.
///
/// The result is sorted by file name and free of duplicates.
pub fn parse_tile_files(html: &str, base_url: &Url) -> Vec<RemoteFile> {
    let document = Html::parse_document(html);
    let tile_regex = TILE_FILE_REGEX.get_or_init(|| {
        Regex::new(TILE_FILE_REGEX_PATTERN).expect("TILE_FILE_REGEX_PATTERN is a valid regex pattern")
    });

    let mut files: BTreeMap<String, RemoteFile> = BTreeMap::new();
    for url in link_targets(&document, base_url) {
        let Some(name) = last_segment(&url).map(str::to_string) else {
            continue;
        };
        if let Some(tile) = tile_regex.captures(&name).and_then(|c| c.get(1)) {
            let tile = tile.as_str().to_string();
            files.insert(name.clone(), RemoteFile { name, tile, url });
        }
    }
    files.into_values().collect()
}
