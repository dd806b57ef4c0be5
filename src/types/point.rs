//! Point types for the boundary network.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ring::{RingId, RingMeta};

/// Stable identity of a unique boundary point.
///
/// Ids are issued densely by the point store in order of first sight and
/// implement `Ord`, so iterating points by id reproduces ingestion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(u32);

impl PointId {
    /// Create a point id from its raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index into the point store.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A geographic coordinate (after reprojection).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Fixed-precision key used to detect coincident points.
    ///
    /// Both components are rendered with `precision` fractional digits and
    /// joined by `|`. Two coordinates are the same point iff their keys match.
    pub fn key(&self, precision: usize) -> String {
        format!("{:.*}|{:.*}", precision, self.lon, precision, self.lat)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// A ring observation of a point: which ring touched it, with that ring's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingRef {
    /// Ring that visited the point.
    pub ring: RingId,
    /// Administrative metadata of that ring.
    pub meta: RingMeta,
}

/// A unique boundary point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Identity of this point.
    pub id: PointId,
    /// Coordinate of the first observation.
    pub coord: Coordinate,
    /// Every ring observation of this point, in visiting order.
    pub references: Vec<RingRef>,
}

impl Point {
    /// Distinct rings touching this point, sorted.
    pub fn rings(&self) -> Vec<RingId> {
        let mut rings: Vec<RingId> = self.references.iter().map(|r| r.ring).collect();
        rings.sort();
        rings.dedup();
        rings
    }
}
