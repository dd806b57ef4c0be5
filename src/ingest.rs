//! Ingestion boundary: raw rings in, interned points and ring index out.
//!
//! The shape reader and the projection are external collaborators. This
//! module receives their output as [`RingRecord`]s plus a [`Reprojection`],
//! applies the reprojection exactly once per raw coordinate, interns the
//! result and validates ring closure.
//!
//! Unclosed rings are reported, never repaired.

use serde::{Deserialize, Serialize};

use crate::store::{PointStore, RingIndex};
use crate::types::{Coordinate, Diagnostic, Diagnostics, Level, RingId, RingMeta, RingRef};

/// Error type for ingestion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    /// A coordinate is NaN or infinite before or after reprojection.
    #[error("Ring {ring_id} has a non-finite coordinate at index {index}: ({x}, {y})")]
    NonFiniteCoordinate {
        /// Own id of the offending ring.
        ring_id: String,
        /// Position within the ring.
        index: usize,
        /// Offending x (or longitude).
        x: f64,
        /// Offending y (or latitude).
        y: f64,
    },
}

/// One input ring as delivered by the shape reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingRecord {
    /// Administrative level.
    pub level: Level,
    /// Own identifier of the unit.
    pub id: String,
    /// Enclosing unit (fine level only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Raw coordinates in source space.
    pub points: Vec<[f64; 2]>,
}

impl RingRecord {
    /// Metadata carried by the ring.
    pub fn meta(&self) -> RingMeta {
        RingMeta {
            level: self.level,
            own_id: self.id.clone(),
            parent_id: self.parent.clone(),
        }
    }
}

/// Container format for ring records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingFile {
    /// Rings in input order.
    pub rings: Vec<RingRecord>,
}

impl RingFile {
    /// Parse a ring file from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Conversion from source coordinates to (longitude, latitude).
pub trait Reprojection {
    /// Project one source coordinate.
    fn reproject(&self, x: f64, y: f64) -> (f64, f64);
}

/// Pass-through projection for input already in lon/lat.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Reprojection for Identity {
    fn reproject(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }
}

impl<F> Reprojection for F
where
    F: Fn(f64, f64) -> (f64, f64),
{
    fn reproject(&self, x: f64, y: f64) -> (f64, f64) {
        self(x, y)
    }
}

/// Incremental ingestion into a point store and ring index.
pub struct Ingestor<R: Reprojection> {
    points: PointStore,
    rings: RingIndex,
    reprojection: R,
}

impl<R: Reprojection> Ingestor<R> {
    /// Create an ingestor keying points with `precision` fractional digits.
    pub fn new(precision: usize, reprojection: R) -> Self {
        Self {
            points: PointStore::with_precision(precision),
            rings: RingIndex::new(),
            reprojection,
        }
    }

    /// Reproject, intern and index one ring.
    ///
    /// The whole ring is validated before any point is interned, so a failed
    /// ring leaves the stores untouched.
    pub fn add_ring(
        &mut self,
        record: &RingRecord,
        diagnostics: &mut Diagnostics,
    ) -> Result<RingId, IngestError> {
        let coords = self.reproject_ring(record)?;

        let meta = record.meta();
        let ring_id = self.rings.next_id();
        let ids = coords
            .into_iter()
            .map(|coord| {
                self.points.intern(
                    coord,
                    RingRef {
                        ring: ring_id,
                        meta: meta.clone(),
                    },
                )
            })
            .collect();
        let id = self.rings.insert(meta, ids);

        if let Some(ring) = self.rings.get(id) {
            if let (Some(&first), Some(&last)) = (ring.points.first(), ring.points.last()) {
                if first != last {
                    diagnostics.push(Diagnostic::UnclosedRing {
                        ring: id,
                        label: ring.label(),
                        first,
                        last,
                    });
                }
            }
            let distinct_points = ring.distinct_points();
            if distinct_points < 2 {
                diagnostics.push(Diagnostic::DegenerateRing {
                    ring: id,
                    label: ring.label(),
                    distinct_points,
                });
            }
        }
        Ok(id)
    }

    fn reproject_ring(&self, record: &RingRecord) -> Result<Vec<Coordinate>, IngestError> {
        record
            .points
            .iter()
            .enumerate()
            .map(|(index, &[x, y])| {
                let non_finite = |x: f64, y: f64| IngestError::NonFiniteCoordinate {
                    ring_id: record.id.clone(),
                    index,
                    x,
                    y,
                };
                if !(x.is_finite() && y.is_finite()) {
                    return Err(non_finite(x, y));
                }
                let coord = Coordinate::from(self.reprojection.reproject(x, y));
                if !coord.is_finite() {
                    return Err(non_finite(coord.lon, coord.lat));
                }
                Ok(coord)
            })
            .collect()
    }

    /// Interned points so far.
    pub fn points(&self) -> &PointStore {
        &self.points
    }

    /// Finish ingestion and hand out the read-only stores.
    pub fn finish(self) -> (PointStore, RingIndex) {
        (self.points, self.rings)
    }
}

/// Ingest all records in order.
pub fn ingest<R: Reprojection>(
    records: &[RingRecord],
    reprojection: R,
    precision: usize,
    diagnostics: &mut Diagnostics,
) -> Result<(PointStore, RingIndex), IngestError> {
    let mut ingestor = Ingestor::new(precision, reprojection);
    for record in records {
        ingestor.add_ring(record, diagnostics)?;
    }
    let (points, rings) = ingestor.finish();
    tracing::info!(rings = rings.len(), points = points.len(), "rings ingested");
    Ok((points, rings))
}
