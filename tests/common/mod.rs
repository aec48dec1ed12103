//! Common test utilities for integration tests

use modis_download::catalog::StaticCatalog;
use modis_download::downloader::TransferEngine;
use modis_download::errors::{AppError, AppResult};
use modis_download::models::{ConnectionParams, DownloadJob};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// Transfer engine that records every job and fails for chosen products.
#[allow(dead_code)]
#[derive(Default)]
pub struct StubEngine {
    failing: HashSet<String>,
    jobs: Mutex<Vec<DownloadJob>>,
}

#[allow(dead_code)]
impl StubEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(products: &[&str]) -> Self {
        Self {
            failing: products.iter().map(|p| p.to_string()).collect(),
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn jobs(&self) -> Vec<DownloadJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

impl TransferEngine for StubEngine {
    async fn download(&self, job: DownloadJob) -> AppResult<PathBuf> {
        self.jobs.lock().unwrap().push(job.clone());
        if self.failing.contains(&job.product_id) {
            return Err(AppError::NetworkError(format!(
                "HTTP 503: {} unavailable",
                job.product_id
            )));
        }
        Ok(job
            .destination
            .join(format!("listfile{}.txt", job.connection.product_code())))
    }
}

/// Catalog with two products, `A` and `B`.
#[allow(dead_code)]
pub fn two_product_catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    catalog.insert("A", ConnectionParams::new("https://pool.example.com", "A/PRODA.061/"));
    catalog.insert("B", ConnectionParams::new("https://pool.example.com", "B/PRODB.061/"));
    catalog
}

/// Writes a two-line settings file into `dir` and returns its path.
#[allow(dead_code)]
pub fn create_settings_file(dir: &std::path::Path, username: &str, password: &str) -> PathBuf {
    let path = dir.join("settings.txt");
    std::fs::write(&path, format!("{username}\n{password}\n")).unwrap();
    path
}

/// In-memory sink for formatted log lines.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's log events into a [`LogCapture`] until the guard is dropped.
#[allow(dead_code)]
pub fn capture_logs() -> (LogCapture, DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
