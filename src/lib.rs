//! modis-download library
//!
//! This crate provides the core functionality for the `modis-download` binary, which
//! fetches batches of MODIS products from the NASA data pools for a date window.
//!
//! ## Overview
//!
//! - [`downloader`] - Resolves the date window and drives one transfer per product
//! - [`catalog`] - Maps product names to their remote location
//! - [`credentials`] - Obtains the data pool username and password
//! - [`destination`] - Chooses and checks the download folder
//! - [`report`] - Per-product outcome of a run
//! - [`cli`] - Command-line interface wiring it all together
//! - [`config`] - TOML run files and transfer defaults
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use modis_download::catalog::StaticCatalog;
//! use modis_download::credentials::Credentials;
//! use modis_download::config::ResolvedConfig;
//! use modis_download::downloader::{resolve_date_window, run_downloads, DownloadRequest, HttpEngine};
//! use modis_download::models::TileFilter;
//! use std::path::Path;
//!
//! # async fn example() -> modis_download::errors::AppResult<()> {
//! let window = resolve_date_window(Some("2020-01-01"), Some("2020-01-11"))?;
//! let tiles = TileFilter::parse(Some("h18v04"))?;
//! let products = vec!["lst_terra_daily_1000".to_string()];
//! let credentials = Credentials::new("anonymous", "me@example.com");
//!
//! let request = DownloadRequest {
//!     products: &products,
//!     window: &window,
//!     tiles: &tiles,
//!     credentials: &credentials,
//!     destination: Path::new("/data/modis"),
//! };
//! let engine = HttpEngine::new(&ResolvedConfig::default())?;
//! let report = run_downloads(&StaticCatalog::modis(), &engine, &request).await?;
//! print!("{}", report.render_summary());
//! # Ok(())
//! # }
//! ```

#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod destination;
pub mod downloader;
pub mod errors;
pub mod models;
pub mod report;
pub mod ui;
pub mod utils;
