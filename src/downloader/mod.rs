//! Date window resolution and the per-product download loop.
//!
//! [`resolve_date_window`] turns the optional start/end options into a [`DateWindow`];
//! [`run_downloads`] hands each requested product to a [`TransferEngine`] and collects
//! the outcomes. [`HttpEngine`] is the engine used by the binary.

mod date_window;
mod engine;
mod file_downloader;
mod listing;
mod orchestrator;

// Re-export public API
pub use date_window::{parse_date, resolve_date_window, DateWindow};
pub use engine::{product_url, HttpEngine, TransferEngine};
pub use listing::{parse_date_dirs, parse_tile_files, RemoteFile};
pub use orchestrator::{resolve_products, run_downloads, DownloadRequest};
