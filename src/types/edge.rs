//! Edge types for the boundary network.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::point::PointId;
use super::ring::RingId;

/// Stable identity of a stored edge.
///
/// Issued by the edge graph from a monotonic counter; ids of removed edges
/// are never reused, so a merged edge always sorts after its constituents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Create an edge id from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Undirected endpoint pair, canonicalized by sorting.
///
/// `EdgePair::new(a, b) == EdgePair::new(b, a)`. A pair whose endpoints are
/// equal identifies a closed chain anchored at that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgePair {
    lo: PointId,
    hi: PointId,
}

impl EdgePair {
    /// Create the canonical pair for two endpoints.
    pub fn new(a: PointId, b: PointId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Smaller endpoint.
    pub fn lo(&self) -> PointId {
        self.lo
    }

    /// Larger endpoint.
    pub fn hi(&self) -> PointId {
        self.hi
    }

    /// Both endpoints are the same point.
    pub fn is_loop(&self) -> bool {
        self.lo == self.hi
    }

    /// `point` is one of the endpoints.
    pub fn contains(&self, point: PointId) -> bool {
        self.lo == point || self.hi == point
    }

    /// Distinct endpoints of this pair (one for a loop).
    pub fn endpoints(&self) -> impl Iterator<Item = PointId> {
        let hi = if self.is_loop() { None } else { Some(self.hi) };
        std::iter::once(self.lo).chain(hi)
    }
}

impl fmt::Display for EdgePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}

/// A boundary way: a polyline over point identities plus the rings that traverse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Geometry in stored order. At least two points for any stored edge.
    pub points: Vec<PointId>,
    /// Every ring whose boundary traverses this edge, in observation order.
    pub owners: Vec<RingId>,
}

impl Edge {
    /// Minimal two-point edge observed on `ring`.
    pub fn segment(from: PointId, to: PointId, ring: RingId) -> Self {
        Self {
            points: vec![from, to],
            owners: vec![ring],
        }
    }

    /// First point of the stored geometry.
    pub fn start(&self) -> Option<PointId> {
        self.points.first().copied()
    }

    /// Last point of the stored geometry.
    pub fn end(&self) -> Option<PointId> {
        self.points.last().copied()
    }

    /// Canonical endpoint pair, if the edge has any points.
    pub fn pair(&self) -> Option<EdgePair> {
        Some(EdgePair::new(self.start()?, self.end()?))
    }

    /// Owning rings as a sorted multiset.
    pub fn sorted_owners(&self) -> Vec<RingId> {
        let mut owners = self.owners.clone();
        owners.sort();
        owners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: u32) -> PointId {
        PointId::new(i)
    }

    #[test]
    fn test_pair_is_canonical() {
        assert_eq!(EdgePair::new(p(3), p(1)), EdgePair::new(p(1), p(3)));
        let pair = EdgePair::new(p(3), p(1));
        assert_eq!(pair.lo(), p(1));
        assert_eq!(pair.hi(), p(3));
        assert!(pair.contains(p(3)));
        assert!(!pair.contains(p(2)));
    }

    #[test]
    fn test_loop_pair() {
        let pair = EdgePair::new(p(4), p(4));
        assert!(pair.is_loop());
        assert_eq!(pair.endpoints().collect::<Vec<_>>(), vec![p(4)]);
        assert_eq!(
            EdgePair::new(p(1), p(2)).endpoints().collect::<Vec<_>>(),
            vec![p(1), p(2)]
        );
    }

    #[test]
    fn test_edge_pair_from_geometry() {
        let edge = Edge {
            points: vec![p(5), p(2), p(9)],
            owners: vec![RingId::new(1)],
        };
        assert_eq!(edge.pair(), Some(EdgePair::new(p(5), p(9))));
        let empty = Edge {
            points: vec![],
            owners: vec![],
        };
        assert_eq!(empty.pair(), None);
    }

    #[test]
    fn test_sorted_owners_keeps_multiplicity() {
        let edge = Edge {
            points: vec![p(0), p(1)],
            owners: vec![RingId::new(2), RingId::new(0), RingId::new(2)],
        };
        assert_eq!(
            edge.sorted_owners(),
            vec![RingId::new(0), RingId::new(2), RingId::new(2)]
        );
    }
}
