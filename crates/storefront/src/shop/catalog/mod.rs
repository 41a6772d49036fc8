//! Restaurant table loading, augmentation and the process-wide cache.

mod augment;
mod parser;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use parser::RestaurantRecord;

/// Shown for restaurants whose table row carries no image.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://cdn.pixabay.com/photo/2017/08/31/10/44/restaurant-2700325_1280.png";

/// Identifier wrapper for catalog rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(pub u64);

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub rating: f64,
    /// Tier symbol such as `€€`.
    pub price: String,
    pub categories: Vec<String>,
    /// Minutes.
    pub delivery_time: u32,
    pub delivery_fee: Decimal,
    pub min_order: Decimal,
    pub image_url: String,
}

impl Restaurant {
    fn from_record(record: RestaurantRecord, fields: augment::OperationalFields) -> Self {
        Self {
            id: RestaurantId(record.id),
            name: record.name,
            rating: record.rating,
            price: record.price,
            categories: record.categories,
            delivery_time: fields.delivery_time,
            delivery_fee: fields.delivery_fee,
            min_order: fields.min_order,
            image_url: record
                .image_url
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("restaurant data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },
}

/// One load cycle of the restaurant table.
#[derive(Debug, Clone, Default)]
pub struct RestaurantCatalog {
    restaurants: Vec<Restaurant>,
    seed: u64,
}

impl RestaurantCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P, seed: u64) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let unavailable = |reason: String| CatalogError::DataUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        let file = std::fs::File::open(path).map_err(|err| unavailable(err.to_string()))?;
        Self::from_reader(file, seed).map_err(|err| unavailable(err.to_string()))
    }

    pub fn from_reader<R: Read>(reader: R, seed: u64) -> Result<Self, csv::Error> {
        let records = parser::parse_records(reader)?;
        let fields = augment::operational_fields(seed, records.len());
        let restaurants = records
            .into_iter()
            .zip(fields)
            .map(|(record, fields)| Restaurant::from_record(record, fields))
            .collect();

        Ok(Self { restaurants, seed })
    }

    /// Falls back to an empty catalog, handing the failure back to the caller.
    pub fn load_or_empty<P: AsRef<Path>>(path: P, seed: u64) -> (Self, Option<CatalogError>) {
        match Self::from_path(path, seed) {
            Ok(catalog) => (catalog, None),
            Err(err) => (
                Self {
                    restaurants: Vec::new(),
                    seed,
                },
                Some(err),
            ),
        }
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// First row carrying `id`; the table itself is not checked for duplicates.
    pub fn find(&self, id: RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| restaurant.id == id)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

/// A cached load together with the failure it produced, if any.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub catalog: Arc<RestaurantCatalog>,
    pub error: Option<CatalogError>,
}

/// Process-wide catalog: loaded at most once, then shared read-only until
/// [`SharedCatalog::reload`] is called.
#[derive(Debug)]
pub struct SharedCatalog {
    path: PathBuf,
    seed: Option<u64>,
    cached: RwLock<Option<CatalogSnapshot>>,
}

impl SharedCatalog {
    pub fn new(path: impl Into<PathBuf>, seed: Option<u64>) -> Self {
        Self {
            path: path.into(),
            seed,
            cached: RwLock::new(None),
        }
    }

    /// Wraps an already-built catalog; `reload` still reads from `path`.
    pub fn preloaded(path: impl Into<PathBuf>, catalog: RestaurantCatalog) -> Self {
        let seed = catalog.seed();
        Self {
            path: path.into(),
            seed: Some(seed),
            cached: RwLock::new(Some(CatalogSnapshot {
                catalog: Arc::new(catalog),
                error: None,
            })),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        if let Some(snapshot) = self
            .cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return snapshot.clone();
        }

        let mut guard = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        // Another reader may have finished the load while we waited for the lock.
        if let Some(snapshot) = guard.as_ref() {
            return snapshot.clone();
        }
        let snapshot = self.load();
        *guard = Some(snapshot.clone());
        snapshot
    }

    /// Re-reads the table and replaces the cached snapshot unconditionally.
    ///
    /// A failed read swaps a previously good catalog for an empty one carrying
    /// the error; the last good table is not kept.
    pub fn reload(&self) -> CatalogSnapshot {
        let snapshot = self.load();
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        snapshot
    }

    fn load(&self) -> CatalogSnapshot {
        let seed = self.seed.unwrap_or_else(augment::fresh_seed);
        let (catalog, error) = RestaurantCatalog::load_or_empty(&self.path, seed);
        match &error {
            None => info!(
                path = %self.path.display(),
                restaurants = catalog.len(),
                seed,
                "restaurant catalog loaded"
            ),
            Some(err) => warn!(error = %err, "restaurant catalog unavailable, serving empty list"),
        }

        CatalogSnapshot {
            catalog: Arc::new(catalog),
            error,
        }
    }
}
