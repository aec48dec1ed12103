//! Per-product outcome of a download run.
//!
//! A [`DownloadReport`] holds one [`ReportEntry`] per requested product, in request
//! order. It renders either as a human summary or, for chaining into an import
//! step, as the bare artifact-list paths.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductStatus {
    /// The engine finished; `list_file` enumerates the downloaded files.
    Success { list_file: PathBuf },
    /// The engine reported an error for this product.
    Failure { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub product_id: String,
    pub status: ProductStatus,
}

impl ReportEntry {
    pub fn success(product_id: &str, list_file: PathBuf) -> Self {
        Self {
            product_id: product_id.to_string(),
            status: ProductStatus::Success { list_file },
        }
    }

    pub fn failure(product_id: &str, error: String) -> Self {
        Self {
            product_id: product_id.to_string(),
            status: ProductStatus::Failure { error },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ProductStatus::Success { .. })
    }

    pub fn list_file(&self) -> Option<&Path> {
        match &self.status {
            ProductStatus::Success { list_file } => Some(list_file),
            ProductStatus::Failure { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    entries: Vec<ReportEntry>,
}

impl DownloadReport {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Human readable summary, one line per product.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            // Writing to a String cannot fail.
            let _ = match &entry.status {
                ProductStatus::Success { list_file } => writeln!(
                    out,
                    "{}: all data downloaded, continue with the import step using files={}",
                    entry.product_id,
                    list_file.display()
                ),
                ProductStatus::Failure { error } => {
                    writeln!(out, "{}: FAILED: {}", entry.product_id, error)
                }
            };
        }
        let _ = writeln!(
            out,
            "{} product(s) downloaded, {} failed",
            self.succeeded(),
            self.failed()
        );
        out
    }

    /// Machine readable output: the artifact-list path of each successful product, one per line.
    pub fn render_list_files(&self) -> String {
        let mut out = String::new();
        for list_file in self.entries.iter().filter_map(ReportEntry::list_file) {
            let _ = writeln!(out, "{}", list_file.display());
        }
        out
    }
}
