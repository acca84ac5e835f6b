//! Player position snapshots.

use serde::{Deserialize, Serialize};

/// Where the player is, plus the map cells covering the area around them.
///
/// A `Location` is an immutable snapshot: movement replaces it wholesale
/// via [`Session::move_to`](crate::Session::move_to). Computing the cell
/// cover is the caller's job; the session only forwards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    lat: f64,
    lon: f64,
    alt: f64,
    accuracy: f64,
    cell_ids: Vec<u64>,
}

impl Location {
    pub fn new(lat: f64, lon: f64, alt: f64, accuracy: f64) -> Self {
        Self {
            lat,
            lon,
            alt,
            accuracy,
            cell_ids: Vec::new(),
        }
    }

    /// Attaches the ordered cell cover for this position.
    pub fn with_cells(mut self, cell_ids: Vec<u64>) -> Self {
        self.cell_ids = cell_ids;
        self
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn alt(&self) -> f64 {
        self.alt
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Cell ids in the order they were computed.
    pub fn cell_ids(&self) -> &[u64] {
        &self.cell_ids
    }
}
