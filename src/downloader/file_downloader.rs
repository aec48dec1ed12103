use crate::config::ResolvedConfig;
use crate::constants::PARTIAL_SUFFIX;
use crate::credentials::Credentials;
use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use url::Url;

/// Extracts HTTP status code from error message if present.
///
/// Looks for the pattern "HTTP {status_code}:" in the error message.
fn extract_status_code(msg: &str) -> Option<u16> {
    let prefix = "HTTP ";
    let start = msg.find(prefix)? + prefix.len();
    let end = msg[start..].find(':').unwrap_or(msg[start..].len());
    msg[start..start + end].trim().parse().ok()
}

/// Determines if an error should trigger a retry attempt.
///
/// Network errors without a status and 5xx responses are retried; 4xx responses
/// (bad credentials, missing file) and local errors are not.
fn should_retry(error: &AppError) -> bool {
    match error {
        AppError::NetworkError(msg) => match extract_status_code(msg) {
            Some(status_code) => status_code >= 500,
            None => true,
        },
        _ => false,
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&ResolvedConfig::default())
    }
}

impl From<&ResolvedConfig> for RetryConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay_ms: config.retry_initial_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// Calculates exponential backoff delay in milliseconds.
///
/// Formula: `min(initial_delay * 2^attempt, max_delay)`
fn calculate_backoff(attempt: u32, config: &RetryConfig) -> u64 {
    let factor = 2_u64.checked_pow(attempt).unwrap_or(u64::MAX);
    config
        .initial_delay_ms
        .saturating_mul(factor)
        .min(config.max_delay_ms)
}

fn partial_path(file_path: &Path) -> PathBuf {
    let mut name = file_path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Downloads `url` to `file_path`, retrying transient failures with backoff.
///
/// Returns the number of bytes written.
pub(crate) async fn download_with_retry(
    client: &reqwest::Client,
    url: &Url,
    credentials: &Credentials,
    file_path: &Path,
    retry_config: &RetryConfig,
) -> AppResult<u64> {
    let tmp_path = partial_path(file_path);
    let mut attempt = 0;

    loop {
        match download_single_file(client, url, credentials, &tmp_path, file_path).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if attempt < retry_config.max_retries && should_retry(&e) => {
                let delay_ms = calculate_backoff(attempt, retry_config);
                warn!(
                    url = %url,
                    attempt = attempt + 1,
                    max_retries = retry_config.max_retries + 1,
                    delay_ms = delay_ms,
                    error = %e,
                    "Retrying download after error"
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
            Err(e) => {
                // Best-effort cleanup of the partial file.
                let _ = fs::remove_file(&tmp_path).await;
                return Err(e);
            }
        }
    }
}

/// Streams one file to a `.part` path and renames it into place once complete.
async fn download_single_file(
    client: &reqwest::Client,
    url: &Url,
    credentials: &Credentials,
    tmp_path: &Path,
    file_path: &Path,
) -> AppResult<u64> {
    let response = client
        .get(url.as_str())
        .basic_auth(&credentials.username, Some(&credentials.password))
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to download {url}: {e}")))?;

    // Keep the status in the message for the retry decision
    let status = response.status();
    let mut response = response.error_for_status().map_err(|e| {
        let status_code = status.as_u16();
        AppError::NetworkError(format!("HTTP {status_code}: Failed to download {url}: {e}"))
    })?;

    let mut file = File::create(tmp_path).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to create temp file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    let mut written = 0_u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await.map_err(|e| {
            AppError::IoError(format!(
                "Failed to write to temp file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);

    fs::rename(tmp_path, file_path).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to rename temp file {} to {}: {}",
            tmp_path.display(),
            file_path.display(),
            e
        ))
    })?;

    Ok(written)
}
