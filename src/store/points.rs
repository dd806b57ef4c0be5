//! Point store: deduplicates coordinates into stable point identities.

use std::collections::HashMap;

use crate::types::{Coordinate, Point, PointId, RingRef};
use crate::DEFAULT_KEY_PRECISION;

/// Interning table for boundary points.
///
/// Coordinates are keyed by a fixed-precision string rendering (see
/// [`Coordinate::key`]). The precision is fixed at construction and used for
/// every key this store computes. The store only grows.
#[derive(Debug, Clone)]
pub struct PointStore {
    precision: usize,
    /// Points by id (ids are dense indices).
    points: Vec<Point>,
    /// Key -> id.
    by_key: HashMap<String, PointId>,
}

impl Default for PointStore {
    fn default() -> Self {
        Self::with_precision(DEFAULT_KEY_PRECISION)
    }
}

impl PointStore {
    /// Create an empty store with the default key precision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store keyed with `precision` fractional digits.
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision,
            points: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Key precision of this store.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Intern a coordinate observed on a ring.
    ///
    /// Returns the existing identity when the coordinate's key was seen
    /// before, otherwise creates a new point. Either way the observation is
    /// appended to the point's references.
    pub fn intern(&mut self, coord: Coordinate, reference: RingRef) -> PointId {
        let key = coord.key(self.precision);
        let id = match self.by_key.get(&key) {
            Some(id) => *id,
            None => {
                let id = PointId::new(self.points.len() as u32);
                self.points.push(Point {
                    id,
                    coord,
                    references: Vec::new(),
                });
                self.by_key.insert(key, id);
                id
            }
        };
        self.points[id.index()].references.push(reference);
        id
    }

    /// Look up an identity without interning.
    pub fn lookup(&self, coord: Coordinate) -> Option<PointId> {
        self.by_key.get(&coord.key(self.precision)).copied()
    }

    /// Get a point by id.
    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.index())
    }

    /// `id` was issued by this store.
    pub fn contains(&self, id: PointId) -> bool {
        id.index() < self.points.len()
    }

    /// Number of unique points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// No point was interned yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}
