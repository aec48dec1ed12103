use crate::config::ResolvedConfig;
use crate::constants::LIST_FILE_PREFIX;
use crate::credentials::Credentials;
use crate::downloader::date_window::DateWindow;
use crate::downloader::file_downloader::{download_with_retry, RetryConfig};
use crate::downloader::listing::{parse_date_dirs, parse_tile_files, RemoteFile};
use crate::errors::{AppError, AppResult};
use crate::models::{ConnectionParams, DownloadJob};
use crate::ui;
use crate::utils::{ensure_trailing_slash, mb_from_bytes, round_two_decimals};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

/// Fetches the files of one product for a date window.
///
/// Implementations own connection setup, listing, per-file retries and writing
/// an artifact list into the job's destination, whose path they return.
pub trait TransferEngine {
    async fn download(&self, job: DownloadJob) -> AppResult<PathBuf>;
}

/// Transfer engine for the HTTP data pools (LP DAAC, NSIDC).
///
/// Each product folder holds one `YYYY.MM.DD/` folder per acquisition date,
/// which in turn holds one HDF file (plus XML metadata) per tile.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: reqwest::Client,
    retry: RetryConfig,
    today: NaiveDate,
}

impl HttpEngine {
    pub fn new(config: &ResolvedConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            retry: RetryConfig::from(config),
            today: chrono::Local::now().date_naive(),
        })
    }

    /// Overrides "today", the date that windows without an anchor count back from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    async fn fetch_listing(&self, url: &Url, credentials: &Credentials) -> AppResult<String> {
        debug!(url = %url, "Fetching listing");
        let body = self
            .client
            .get(url.as_str())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    /// Lists the files of every acquisition folder inside the window, newest folder first.
    async fn collect_files(&self, base: &Url, job: &DownloadJob) -> AppResult<Vec<RemoteFile>> {
        let listing = self.fetch_listing(base, &job.credentials).await?;
        let days = select_days(parse_date_dirs(&listing, base), &job.window, self.today);

        if days.is_empty() {
            let (earliest, latest) = job.window.bounds(self.today);
            warn!(
                product = %job.product_id,
                earliest = %earliest,
                latest = %latest,
                "No acquisition dates available in the window"
            );
        }

        let mut files = Vec::new();
        for (day, url) in days {
            let listing = self.fetch_listing(&url, &job.credentials).await?;
            let matching: Vec<RemoteFile> = parse_tile_files(&listing, &url)
                .into_iter()
                .filter(|f| job.tiles.matches(&f.tile))
                .collect();
            debug!(day = %day, files = matching.len(), "Listed acquisition folder");
            files.extend(matching);
        }
        Ok(files)
    }
}

impl TransferEngine for HttpEngine {
    async fn download(&self, job: DownloadJob) -> AppResult<PathBuf> {
        let base = product_url(&job.connection)?;
        let files = self.collect_files(&base, &job).await?;

        let pb = ui::create_progress_bar(files.len() as u64, &job.product_id)?;
        let mut hdf_files = Vec::with_capacity(files.len());
        let mut errors = Vec::new();
        let mut total_bytes = 0_u64;

        for file in &files {
            let local_path = job.destination.join(&file.name);
            pb.set_message(file.name.clone());

            if local_path.exists() {
                debug!(path = %local_path.display(), "Skipping existing file");
            } else {
                match download_with_retry(
                    &self.client,
                    &file.url,
                    &job.credentials,
                    &local_path,
                    &self.retry,
                )
                .await
                {
                    Ok(bytes) => total_bytes += bytes,
                    Err(e) => {
                        warn!(file = %file.name, error = %e, "Failed to download file");
                        errors.push(format!("{}: {e}", file.name));
                        pb.inc(1);
                        continue;
                    }
                }
            }

            if file.is_hdf() {
                hdf_files.push(local_path);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        let list_file = write_list_file(&job.destination, &job.connection, &hdf_files).await?;
        info!(
            product = %job.product_id,
            files = hdf_files.len(),
            megabytes = round_two_decimals(mb_from_bytes(total_bytes)),
            list_file = %list_file.display(),
            "Product transfer finished"
        );

        if !errors.is_empty() {
            return Err(AppError::NetworkError(format!(
                "Failed to download {} file(s): {}",
                errors.len(),
                errors.join("; ")
            )));
        }

        Ok(list_file)
    }
}

/// Keeps the acquisition folders inside the window, newest first.
fn select_days(
    dirs: BTreeMap<NaiveDate, Url>,
    window: &DateWindow,
    today: NaiveDate,
) -> Vec<(NaiveDate, Url)> {
    dirs.into_iter()
        .rev()
        .filter(|(day, _)| window.contains(*day, today))
        .collect()
}

/// Absolute URL of the product folder, always ending in `/`.
pub fn product_url(params: &ConnectionParams) -> AppResult<Url> {
    let host = Url::parse(&ensure_trailing_slash(&params.url))?;
    let remote_path = ensure_trailing_slash(params.remote_path.trim_start_matches('/'));
    Ok(host.join(&remote_path)?)
}

/// Writes `listfile<PRODUCT>.txt` with one downloaded HDF path per line.
async fn write_list_file(
    destination: &Path,
    params: &ConnectionParams,
    hdf_files: &[PathBuf],
) -> AppResult<PathBuf> {
    let list_path = destination.join(format!("{LIST_FILE_PREFIX}{}.txt", params.product_code()));
    let mut contents = String::new();
    for path in hdf_files {
        contents.push_str(&path.display().to_string());
        contents.push('\n');
    }
    fs::write(&list_path, contents).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to write file list {}: {}",
            list_path.display(),
            e
        ))
    })?;
    Ok(list_path)
}
