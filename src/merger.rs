//! Chain merging to a fixed point.
//!
//! ## Algorithm
//!
//! 1. Record the edge count
//! 2. Visit every point still ending an edge, in id order
//! 3. At a point of degree exactly 2, fuse its two edges into one, provided
//!    both are traversed by the same rings
//! 4. Repeat full passes until a pass leaves the edge count unchanged
//!
//! Each merge removes two edges and inserts one, so the edge count strictly
//! decreases and the loop terminates after at most `initial_edges` merges.
//! Points of degree 1 (dead ends, anchors of closed ways) and degree >= 3
//! (junctions) are never merged away.
//!
//! Passes are sequential: a merge changes the degree of points visited later
//! in the same pass, which is why a single pass is not enough.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::graph::{EdgeGraph, GraphError};
use crate::types::{Diagnostic, Diagnostics, Edge, EdgeId, PointId};

/// Geometry integrity failure. Aborts the merge step.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// An edge proposed for merging has fewer than two points.
    #[error("Edge {edge} at {point} has {len} point(s), cannot merge")]
    TooFewPoints {
        /// Point under examination.
        point: PointId,
        /// Offending edge.
        edge: EdgeId,
        /// Number of points stored.
        len: usize,
    },
    /// Neither orientation of the two edges meets at the point under examination.
    #[error("Edges {left} and {right} do not share endpoint {point}")]
    NoSharedEndpoint {
        /// Point under examination.
        point: PointId,
        /// First edge.
        left: EdgeId,
        /// Second edge.
        right: EdgeId,
    },
    /// The incidence index names an edge that is not stored.
    #[error("Incidence index at {point} references missing edge {edge}")]
    DanglingIncidence {
        /// Point whose bucket is stale.
        point: PointId,
        /// Missing edge.
        edge: EdgeId,
    },
    /// Graph rejected the merged edge.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Edge counts of one full pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    /// 1-based pass number.
    pub pass: usize,
    /// Edges at pass start.
    pub edges_before: usize,
    /// Edges at pass end.
    pub edges_after: usize,
    /// Successful merges in this pass.
    pub merges: usize,
}

/// Outcome of [`ChainMerger::merge_to_fixed_point`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Per-pass statistics, in order. The last pass performed no merge.
    pub passes: Vec<PassStats>,
}

impl MergeSummary {
    /// Total successful merges.
    pub fn total_merges(&self) -> usize {
        self.passes.iter().map(|p| p.merges).sum()
    }

    /// Edge count before the first pass.
    pub fn initial_edges(&self) -> usize {
        self.passes.first().map_or(0, |p| p.edges_before)
    }

    /// Edge count after the last pass.
    pub fn final_edges(&self) -> usize {
        self.passes.last().map_or(0, |p| p.edges_after)
    }
}

/// Fuses degree-2 chains until no pass changes the graph.
#[derive(Debug, Default)]
pub struct ChainMerger {
    /// Points already reported for an owner mismatch.
    reported: BTreeSet<PointId>,
}

impl ChainMerger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge passes until the edge count stops changing.
    ///
    /// Owner mismatches are recorded in `diagnostics` (once per point) and
    /// leave the edges unmerged. Integrity errors abort immediately; the graph
    /// then holds the state reached before the failing merge.
    pub fn merge_to_fixed_point(
        &mut self,
        graph: &mut EdgeGraph,
        diagnostics: &mut Diagnostics,
    ) -> Result<MergeSummary, MergeError> {
        let mut summary = MergeSummary::default();

        loop {
            let pass = summary.passes.len() + 1;
            let edges_before = graph.count();
            let merges = self.run_pass(graph, diagnostics).map_err(|e| {
                tracing::error!(pass = pass, error = %e, "merge aborted");
                e
            })?;
            let edges_after = graph.count();

            tracing::info!(
                pass = pass,
                edges_before = edges_before,
                edges_after = edges_after,
                merges = merges,
                "merge pass complete"
            );
            summary.passes.push(PassStats {
                pass,
                edges_before,
                edges_after,
                merges,
            });

            if edges_after == edges_before {
                break;
            }
        }
        Ok(summary)
    }

    /// One full pass over the points present at pass start.
    fn run_pass(
        &mut self,
        graph: &mut EdgeGraph,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize, MergeError> {
        let mut merges = 0;
        for point in graph.points() {
            // Degrees change as the pass mutates the graph.
            if graph.degree(point) == 2 && self.merge_at(graph, point, diagnostics)? {
                merges += 1;
            }
        }
        Ok(merges)
    }

    /// Fuse the two edges meeting at `point`. Returns whether a merge happened.
    fn merge_at(
        &mut self,
        graph: &mut EdgeGraph,
        point: PointId,
        diagnostics: &mut Diagnostics,
    ) -> Result<bool, MergeError> {
        let ids = graph.incident_ids(point);
        let &[left_id, right_id] = ids.as_slice() else {
            return Ok(false);
        };

        let merged = {
            let left = graph
                .get(left_id)
                .ok_or(MergeError::DanglingIncidence { point, edge: left_id })?;
            let right = graph
                .get(right_id)
                .ok_or(MergeError::DanglingIncidence { point, edge: right_id })?;

            for (id, edge) in [(left_id, left), (right_id, right)] {
                if edge.points.len() < 2 {
                    return Err(MergeError::TooFewPoints {
                        point,
                        edge: id,
                        len: edge.points.len(),
                    });
                }
            }

            let points = fuse(point, &left.points, &right.points).ok_or(
                MergeError::NoSharedEndpoint {
                    point,
                    left: left_id,
                    right: right_id,
                },
            )?;

            let left_owners = left.sorted_owners();
            let right_owners = right.sorted_owners();
            if left_owners != right_owners {
                if self.reported.insert(point) {
                    diagnostics.push(Diagnostic::OwnerMismatch {
                        point,
                        left: left_owners,
                        right: right_owners,
                    });
                }
                return Ok(false);
            }

            Edge {
                points,
                owners: left_owners,
            }
        };

        graph.remove(left_id);
        graph.remove(right_id);
        graph.insert(merged)?;
        Ok(true)
    }
}

/// Merge passes on `graph` with a fresh merger.
pub fn merge_to_fixed_point(
    graph: &mut EdgeGraph,
    diagnostics: &mut Diagnostics,
) -> Result<MergeSummary, MergeError> {
    ChainMerger::new().merge_to_fixed_point(graph, diagnostics)
}

/// Concatenate two polylines meeting at `point`, keeping `point` once.
///
/// Orientation cases, checked in order:
///
/// - `left` ends and `right` starts at `point`: `left + right`
/// - `right` ends and `left` starts at `point`: `right + left`
/// - both end at `point`: `left + reversed(right)`
/// - both start at `point`: `reversed(left) + right`
///
/// Stored sequences are never reversed in place. Returns `None` when either
/// input has fewer than two points or no case applies.
pub fn fuse(point: PointId, left: &[PointId], right: &[PointId]) -> Option<Vec<PointId>> {
    if left.len() < 2 || right.len() < 2 {
        return None;
    }
    let (l_start, l_end) = (*left.first()?, *left.last()?);
    let (r_start, r_end) = (*right.first()?, *right.last()?);

    let mut merged = Vec::with_capacity(left.len() + right.len() - 1);
    if l_end == point && r_start == point {
        merged.extend_from_slice(left);
        merged.extend_from_slice(&right[1..]);
    } else if r_end == point && l_start == point {
        merged.extend_from_slice(right);
        merged.extend_from_slice(&left[1..]);
    } else if l_end == point && r_end == point {
        merged.extend_from_slice(left);
        merged.extend(right.iter().rev().skip(1));
    } else if l_start == point && r_start == point {
        merged.extend(left.iter().rev());
        merged.extend_from_slice(&right[1..]);
    } else {
        return None;
    }
    Some(merged)
}
