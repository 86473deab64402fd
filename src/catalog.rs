//! Station catalog loading and the immutable in-memory snapshot.
//!
//! The catalog is read once at process start. Requests receive it by
//! reference and never mutate it, so a single snapshot can serve
//! concurrent pipelines without locking; reloading means building a new
//! snapshot and swapping it in.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// One fuel station from the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub address: String,
    /// Unit fuel price, USD per gallon.
    pub price: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
}

/// Immutable, ordered snapshot of the station catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationCatalog {
    stations: Vec<StationRecord>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read station catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse station catalog: {0}")]
    Csv(#[from] csv::Error),
}

/// Raw CSV row as exported by the price feed. `Geocode` holds a
/// `(lng, lat)` tuple literal and is absent for unlocatable stations.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Truckstop Name")]
    name: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Retail Price")]
    price: f64,
    #[serde(rename = "Geocode")]
    geocode: Option<String>,
}

impl StationCatalog {
    pub fn new(stations: Vec<StationRecord>) -> Self {
        Self { stations }
    }

    /// Loads a `;`-delimited catalog file.
    ///
    /// Rows without a usable geocode are skipped with a warning; a
    /// catalog with some bad rows is still usable.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(reader);

        let mut stations = Vec::new();
        let mut skipped = 0usize;
        for row in csv_reader.deserialize::<RawRow>() {
            let row = row?;
            match row.geocode.as_deref().and_then(parse_geocode) {
                Some((lng, lat)) => stations.push(StationRecord {
                    name: row.name,
                    address: row.address,
                    price: row.price,
                    lng,
                    lat,
                }),
                None => {
                    skipped += 1;
                    warn!(station = %row.name, "skipping station without usable geocode");
                }
            }
        }

        info!(loaded = stations.len(), skipped, "station catalog loaded");
        Ok(Self { stations })
    }

    pub fn stations(&self) -> &[StationRecord] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Parses a `(lng, lat)` tuple literal such as `"(-98.90258, 32.75175)"`.
fn parse_geocode(raw: &str) -> Option<(f64, f64)> {
    let inner = raw.trim().trim_start_matches('(').trim_end_matches(')');
    let (lng, lat) = inner.split_once(',')?;
    let lng: f64 = lng.trim().parse().ok()?;
    let lat: f64 = lat.trim().parse().ok()?;
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return None;
    }
    Some((lng, lat))
}
