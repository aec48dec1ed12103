use crate::catalog::{Catalog, StaticCatalog};
use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::constants::{DATE_FORMAT_HELP, DEFAULT_PRODUCT};
use crate::credentials::{CredentialSource, InteractivePrompt, SettingsFile};
use crate::destination::{resolve_destination, SettingSource};
use crate::downloader::{
    resolve_date_window, resolve_products, run_downloads, DownloadRequest, HttpEngine,
};
use crate::errors::{AppError, AppResult};
use crate::models::TileFilter;
use crate::report::DownloadReport;
use crate::utils::{format_duration, split_list};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Everything one download run needs from the user, however it was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub setting: SettingSource,
    pub products: Vec<String>,
    pub tiles: Vec<String>,
    pub startday: Option<String>,
    pub endday: Option<String>,
    pub folder: Option<PathBuf>,
    pub list_only: bool,
    pub debug: bool,
}

impl RunOptions {
    /// Reads the options of the `cli` subcommand.
    pub fn from_matches(sub: &ArgMatches) -> AppResult<Self> {
        let setting = sub
            .get_one::<String>("setting")
            .ok_or_else(|| AppError::InvalidInput("The setting option is required".to_string()))?;
        let products = sub
            .get_one::<String>("product")
            .map(|s| split_list(s))
            .unwrap_or_else(|| vec![DEFAULT_PRODUCT.to_string()]);

        Ok(Self {
            setting: SettingSource::parse(setting),
            products,
            tiles: sub
                .get_one::<String>("tiles")
                .map(|s| split_list(s))
                .unwrap_or_default(),
            startday: sub.get_one::<String>("startday").cloned(),
            endday: sub.get_one::<String>("endday").cloned(),
            folder: sub.get_one::<PathBuf>("folder").cloned(),
            list_only: sub.get_flag("list_only"),
            debug: sub.get_flag("debug"),
        })
    }
}

impl From<&ResolvedConfigFile> for RunOptions {
    fn from(file: &ResolvedConfigFile) -> Self {
        Self {
            setting: SettingSource::parse(&file.setting),
            products: file
                .product
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            tiles: file.tiles.clone(),
            startday: file.startday.clone(),
            endday: file.endday.clone(),
            folder: file.folder.clone(),
            list_only: file.list_only,
            debug: file.debug,
        }
    }
}

/// Builds the `modis-download` command tree.
pub fn build_command() -> Command {
    Command::new("modis-download")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("cli")
                .about("Download one or more MODIS products for a date window")
                .after_help("Without dates the download starts today and goes back 10 days.\nExample:\n  modis-download cli -s ~/modis/settings.txt -p lst_terra_daily_1000,lst_aqua_daily_1000 -t h18v04 --startday 2020-01-01 --endday 2020-01-11")
                .arg(
                    Arg::new("setting")
                        .short('s')
                        .long("setting")
                        .help("Two-line file with username and password, or '-' to type them in")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("product")
                        .short('p')
                        .long("product")
                        .help("Name(s) of MODIS product(s), comma separated")
                        .default_value(DEFAULT_PRODUCT)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("tiles")
                        .short('t')
                        .long("tiles")
                        .help("Tile(s) to download, comma separated (e.g. h18v04); all tiles if unset")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("startday")
                        .long("startday")
                        .value_name(DATE_FORMAT_HELP)
                        .help("First date to download; without endday the download covers the 10 days after it")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("endday")
                        .long("endday")
                        .value_name(DATE_FORMAT_HELP)
                        .help("Last date to download, only together with startday")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("folder")
                        .short('f')
                        .long("folder")
                        .help("Folder to store the downloaded data; defaults to the folder of the setting file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("debug")
                        .short('d')
                        .help("Log debug information")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("list_only")
                        .short('g')
                        .help("Print only the path of each product's file list, for scripts")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("toml")
                .about("Run using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("products").about("List the known product names"))
}

/// Parses command-line arguments and executes the selected subcommand.
///
/// - `cli`: download with options given on the command line
/// - `toml`: download with options read from a TOML file
/// - `products`: list the catalog
///
/// The report is written to stdout; logs go to stderr.
///
/// # Errors
///
/// Configuration and environment errors are returned before any download starts.
/// When every product was attempted but some failed, the report is still printed
/// and `PartialFailure` is returned.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    match matches.subcommand() {
        Some(("cli", sub)) => {
            let options = RunOptions::from_matches(sub)?;
            init_tracing(options.debug);
            let catalog = StaticCatalog::modis();
            let report = run_workflow(&options, &catalog, &ResolvedConfig::default()).await?;
            finish(&report, options.list_only)
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("Config path is required".to_string()))?;

            let file_config = ResolvedConfigFile::from_toml_file(config_path)?;
            init_tracing(file_config.debug);

            let mut catalog = StaticCatalog::modis();
            catalog.extend(file_config.catalog.clone());
            let options = RunOptions::from(&file_config);

            let report = run_workflow(&options, &catalog, &file_config.resolved).await?;
            finish(&report, options.list_only)
        }
        Some(("products", _)) => {
            print!("{}", render_catalog(&StaticCatalog::modis()));
            Ok(())
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
            Ok(())
        }
    }
}

/// Runs one download: resolves the window, tiles and products, checks the
/// destination, obtains credentials and hands every product to the HTTP engine.
pub async fn run_workflow<C: Catalog>(
    options: &RunOptions,
    catalog: &C,
    config: &ResolvedConfig,
) -> AppResult<DownloadReport> {
    let started = Instant::now();

    let window = resolve_date_window(options.startday.as_deref(), options.endday.as_deref())?;
    let tiles = TileFilter::from_names(&options.tiles)?;
    resolve_products(catalog, &options.products)?;
    print_download_info(options, &tiles);

    let destination = resolve_destination(&options.setting, options.folder.as_deref())?;
    let credentials = credential_source(&options.setting).obtain()?;
    let engine = HttpEngine::new(config)?;

    let request = DownloadRequest {
        products: &options.products,
        window: &window,
        tiles: &tiles,
        credentials: &credentials,
        destination: &destination,
    };
    let report = run_downloads(catalog, &engine, &request).await?;

    info!(
        products = report.len(),
        elapsed = %format_duration(started.elapsed()),
        "All products attempted"
    );
    Ok(report)
}

fn credential_source(setting: &SettingSource) -> Box<dyn CredentialSource> {
    match setting {
        SettingSource::File(path) => Box::new(SettingsFile::new(path.clone())),
        SettingSource::Prompt => Box::new(InteractivePrompt),
    }
}

fn finish(report: &DownloadReport, list_only: bool) -> AppResult<()> {
    if list_only {
        print!("{}", report.render_list_files());
    } else {
        print!("{}", report.render_summary());
    }

    if report.failed() > 0 {
        return Err(AppError::PartialFailure {
            failed: report.failed(),
            total: report.len(),
        });
    }
    Ok(())
}

fn render_catalog(catalog: &StaticCatalog) -> String {
    catalog
        .iter()
        .map(|(name, params)| format!("{name}\t{}/{}\n", params.url, params.remote_path))
        .collect()
}

fn print_download_info(options: &RunOptions, tiles: &TileFilter) {
    let start_text = options.startday.as_deref().unwrap_or("today");
    let end_text = options.endday.as_deref().unwrap_or("10 days");
    info!(
        products = %options.products.join(","),
        tiles = %tiles,
        startday = start_text,
        endday = end_text,
        "Starting download"
    );
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
