use crate::catalog::Catalog;
use crate::credentials::Credentials;
use crate::downloader::date_window::DateWindow;
use crate::downloader::engine::TransferEngine;
use crate::errors::{AppError, AppResult};
use crate::models::{ConnectionParams, DownloadJob, TileFilter};
use crate::report::{DownloadReport, ReportEntry};
use std::path::Path;
use tracing::{info, warn};

/// Inputs shared by every product of one run.
#[derive(Debug, Clone, Copy)]
pub struct DownloadRequest<'a> {
    pub products: &'a [String],
    pub window: &'a DateWindow,
    pub tiles: &'a TileFilter,
    pub credentials: &'a Credentials,
    pub destination: &'a Path,
}

/// Looks up every product in the catalog, keeping request order.
///
/// # Errors
///
/// Returns `UnknownProduct` for the first name the catalog does not know.
pub fn resolve_products<'a, C>(
    catalog: &'a C,
    products: &'a [String],
) -> AppResult<Vec<(&'a str, &'a ConnectionParams)>>
where
    C: Catalog + ?Sized,
{
    products
        .iter()
        .map(|product_id| {
            catalog
                .lookup(product_id)
                .map(|params| (product_id.as_str(), params))
                .ok_or_else(|| AppError::UnknownProduct(product_id.clone()))
        })
        .collect()
}

/// Downloads every requested product, one engine call at a time.
///
/// All products are looked up in the catalog before the first engine call, so an
/// unknown product aborts the run without any network activity. Once downloads
/// start, an engine error for one product is recorded in the report and the
/// remaining products are still attempted.
///
/// # Returns
///
/// A report with exactly one entry per requested product, in request order.
///
/// # Errors
///
/// Returns `InvalidInput` if no products are requested and `UnknownProduct` for the
/// first product the catalog does not know. Engine failures never surface here.
pub async fn run_downloads<C, E>(
    catalog: &C,
    engine: &E,
    request: &DownloadRequest<'_>,
) -> AppResult<DownloadReport>
where
    C: Catalog + ?Sized,
    E: TransferEngine,
{
    if request.products.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one product is required".to_string(),
        ));
    }

    let resolved = resolve_products(catalog, request.products)?;

    if request.tiles.is_all() {
        warn!("Option 'tiles' not set. Downloading all available tiles");
    }

    let mut report = DownloadReport::with_capacity(resolved.len());

    for (product_id, params) in resolved {
        let job = DownloadJob {
            product_id: product_id.to_string(),
            connection: params.clone(),
            window: *request.window,
            tiles: request.tiles.clone(),
            credentials: request.credentials.clone(),
            destination: request.destination.to_path_buf(),
        };

        info!(
            product = product_id,
            url = %params.url,
            remote_path = %params.remote_path,
            "Downloading MODIS product"
        );

        match engine.download(job).await {
            Ok(list_file) => {
                info!(
                    product = product_id,
                    list_file = %list_file.display(),
                    "Product downloaded"
                );
                report.push(ReportEntry::success(product_id, list_file));
            }
            Err(e) => {
                warn!(product = product_id, error = %e, "Product download failed");
                report.push(ReportEntry::failure(product_id, e.to_string()));
            }
        }
    }

    info!(
        downloaded = report.succeeded(),
        failed = report.failed(),
        "Download run finished"
    );

    Ok(report)
}
