use crate::constants::MODIS_PRODUCTS;
use crate::models::ConnectionParams;
use std::collections::BTreeMap;

/// Maps product names to their location on the remote data pool.
pub trait Catalog {
    /// Returns `None` when the product is not known.
    fn lookup(&self, product_id: &str) -> Option<&ConnectionParams>;
}

/// In-memory catalog, ordered by product name.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: BTreeMap<String, ConnectionParams>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The MODIS land surface temperature, vegetation index and snow products.
    pub fn modis() -> Self {
        let entries = MODIS_PRODUCTS
            .iter()
            .map(|(name, url, path)| (name.to_string(), ConnectionParams::new(url, path)))
            .collect();
        Self { entries }
    }

    /// Adds or replaces entries, e.g. the `[catalog]` tables of a config file.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, ConnectionParams)>,
    {
        self.entries.extend(entries);
    }

    pub fn insert(&mut self, product_id: &str, params: ConnectionParams) {
        self.entries.insert(product_id.to_string(), params);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConnectionParams)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn lookup(&self, product_id: &str) -> Option<&ConnectionParams> {
        self.entries.get(product_id.trim())
    }
}
