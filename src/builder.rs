//! Minimal edge extraction.
//!
//! Walks every ring and emits one two-point edge per pair of consecutive
//! distinct observations. Segments shared by several rings are stored once;
//! later observations only append their ring to the owning list.

use crate::graph::{EdgeGraph, GraphError};
use crate::store::{PointStore, RingIndex};
use crate::types::{Diagnostic, Diagnostics, Edge, EdgePair, PointId, Ring, RingId};

/// Error type for edge extraction.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Ring references a point the store never issued.
    #[error("Ring {ring} references unknown point {point}")]
    UnknownPoint {
        /// Offending ring.
        ring: RingId,
        /// Unknown point id.
        point: PointId,
    },
    /// Graph rejected an edge.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Build the graph of minimal, deduplicated edges for all rings.
///
/// A ring visiting `k` observations (after collapsing immediate repeats)
/// contributes `k - 1` segments. Rings are walked as given: an unclosed ring
/// does not get a closing segment.
pub fn build(
    rings: &RingIndex,
    points: &PointStore,
    diagnostics: &mut Diagnostics,
) -> Result<EdgeGraph, BuildError> {
    let mut graph = EdgeGraph::new();
    let mut segments = 0usize;

    for ring in rings.iter() {
        segments += walk_ring(&mut graph, ring, points, diagnostics)?;
    }

    tracing::info!(
        rings = rings.len(),
        points = points.len(),
        segments = segments,
        edges = graph.count(),
        "minimal edges built"
    );
    Ok(graph)
}

/// Emit the segments of one ring. Returns the number of segments walked.
fn walk_ring(
    graph: &mut EdgeGraph,
    ring: &Ring,
    points: &PointStore,
    diagnostics: &mut Diagnostics,
) -> Result<usize, BuildError> {
    let mut window: Vec<PointId> = Vec::with_capacity(2);
    let mut segments = 0;

    for &point in &ring.points {
        if !points.contains(point) {
            return Err(BuildError::UnknownPoint {
                ring: ring.id,
                point,
            });
        }
        // Zero-length segment.
        if window.last() == Some(&point) {
            continue;
        }
        window.push(point);
        if window.len() == 2 {
            append_segment(graph, window[0], window[1], ring.id, diagnostics)?;
            segments += 1;
            window.clear();
            window.push(point);
        }
    }
    Ok(segments)
}

/// Insert a segment, or attribute an existing one with the same endpoints to `ring`.
fn append_segment(
    graph: &mut EdgeGraph,
    from: PointId,
    to: PointId,
    ring: RingId,
    diagnostics: &mut Diagnostics,
) -> Result<(), BuildError> {
    let pair = EdgePair::new(from, to);
    let Some(existing) = graph.find(pair) else {
        graph.insert(Edge::segment(from, to, ring))?;
        return Ok(());
    };

    if let Some(stored) = graph.get(existing) {
        if !same_segment(&stored.points, from, to) {
            diagnostics.push(Diagnostic::GeometryMismatch {
                pair,
                ring,
                stored: stored.points.clone(),
                observed: vec![from, to],
            });
        }
    }
    graph.add_owner(existing, ring);
    Ok(())
}

/// `stored` is the two-point segment `from`-`to` in either direction.
fn same_segment(stored: &[PointId], from: PointId, to: PointId) -> bool {
    stored == [from, to] || stored == [to, from]
}
