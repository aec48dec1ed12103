// Date window
pub const DEFAULT_WINDOW_DAYS: u64 = 10;
pub const DATE_FORMAT_HELP: &str = "YYYY-MM-DD";

// Product selection
pub const DEFAULT_PRODUCT: &str = "lst_terra_daily_1000";

// Data pool hosts
pub const LP_DAAC_URL: &str = "https://e4ftl01.cr.usgs.gov";
pub const NSIDC_URL: &str = "https://n5eil01u.ecs.nsidc.org";

// Built-in product catalog: (name, host, remote folder)
pub const MODIS_PRODUCTS: &[(&str, &str, &str)] = &[
    ("lst_terra_daily_1000", LP_DAAC_URL, "MOLT/MOD11A1.061/"),
    ("lst_aqua_daily_1000", LP_DAAC_URL, "MOLA/MYD11A1.061/"),
    ("lst_terra_eight_1000", LP_DAAC_URL, "MOLT/MOD11A2.061/"),
    ("lst_aqua_eight_1000", LP_DAAC_URL, "MOLA/MYD11A2.061/"),
    ("lst_terra_daily_6000", LP_DAAC_URL, "MOLT/MOD11B1.061/"),
    ("lst_aqua_daily_6000", LP_DAAC_URL, "MOLA/MYD11B1.061/"),
    ("ndvi_terra_sixteen_250", LP_DAAC_URL, "MOLT/MOD13Q1.061/"),
    ("ndvi_aqua_sixteen_250", LP_DAAC_URL, "MOLA/MYD13Q1.061/"),
    ("ndvi_terra_sixteen_500", LP_DAAC_URL, "MOLT/MOD13A1.061/"),
    ("ndvi_aqua_sixteen_500", LP_DAAC_URL, "MOLA/MYD13A1.061/"),
    ("snow_terra_daily_500", NSIDC_URL, "MOST/MOD10A1.061/"),
    ("snow_aqua_daily_500", NSIDC_URL, "MOSA/MYD10A1.061/"),
    ("snow_terra_eight_500", NSIDC_URL, "MOST/MOD10A2.061/"),
    ("snow_aqua_eight_500", NSIDC_URL, "MOSA/MYD10A2.061/"),
];

// Selectors and Patterns
pub const LISTING_LINK_SELECTOR: &str = "a[href]";
pub const DATE_DIR_REGEX_PATTERN: &str = r"^(\d{4})\.(\d{2})\.(\d{2})/?$";
pub const TILE_FILE_REGEX_PATTERN: &str = r"\.(h\d{2}v\d{2})\.[^/]*\.hdf(\.xml)?$";
pub const TILE_NAME_REGEX_PATTERN: &str = r"^h\d{2}v\d{2}$";

// Output
pub const LIST_FILE_PREFIX: &str = "listfile";
pub const PARTIAL_SUFFIX: &str = ".part";
pub const STDIN_SETTING: &str = "-";
