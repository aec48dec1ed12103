use crate::errors::{AppError, AppResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Creates the progress bar shown while one product's files are transferred.
///
/// The bar is prefixed with the product name and draws to stderr, so stdout
/// stays clean for the report.
///
/// # Example
///
/// ```no_run
/// use modis_download::ui;
///
/// # fn main() -> Result<(), modis_download::errors::AppError> {
/// let pb = ui::create_progress_bar(12, "lst_terra_daily_1000")?;
/// pb.inc(1);
/// pb.finish_and_clear();
/// # Ok(())
/// # }
/// ```
pub fn create_progress_bar(total: u64, product: &str) -> AppResult<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{prefix:.bold} {spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .map_err(|e| AppError::IoError(format!("Failed to create progress bar template: {e}")))?
            .progress_chars("#>-"),
    );
    pb.set_prefix(product.to_string());
    Ok(pb)
}
