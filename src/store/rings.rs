//! Ring index: loaded rings as point-identity sequences.

use std::collections::BTreeMap;

use crate::types::{Level, PointId, Ring, RingId, RingMeta};

/// Read-only collection of rings once loaded.
///
/// Ring ids are dense and follow insertion order; ordinals count rings per
/// administrative level.
#[derive(Debug, Clone, Default)]
pub struct RingIndex {
    rings: Vec<Ring>,
    ordinals: BTreeMap<Level, u32>,
}

impl RingIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next inserted ring will receive.
    pub fn next_id(&self) -> RingId {
        RingId::new(self.rings.len() as u32)
    }

    /// Append a ring and return its id.
    pub fn insert(&mut self, meta: RingMeta, points: Vec<PointId>) -> RingId {
        let id = self.next_id();
        let ordinal = self.ordinals.entry(meta.level).or_insert(0);
        self.rings.push(Ring {
            id,
            ordinal: *ordinal,
            meta,
            points,
        });
        *ordinal += 1;
        id
    }

    /// Get a ring by id.
    pub fn get(&self, id: RingId) -> Option<&Ring> {
        self.rings.get(id.index())
    }

    /// Number of rings.
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// No ring was loaded.
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// All rings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter()
    }

    /// Rings of one administrative level.
    pub fn at_level(&self, level: Level) -> impl Iterator<Item = &Ring> {
        self.rings.iter().filter(move |r| r.meta.level == level)
    }
}
