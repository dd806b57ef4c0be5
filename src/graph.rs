//! Edge graph: undirected multigraph of boundary ways.
//!
//! Edges are stored by [`EdgeId`] and indexed twice:
//!
//! - by canonical endpoint pair, so the builder can find an existing segment;
//! - by endpoint, so degree queries do not scan the whole graph.
//!
//! Every structural mutation goes through [`EdgeGraph::insert`] and
//! [`EdgeGraph::remove`], which keep both indexes consistent with the edge map
//! and drop index buckets that become empty.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Edge, EdgeId, EdgePair, PointId, RingId};

/// Error type for graph mutations and consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Edge geometry too short to define two endpoints.
    #[error("Edge has {len} point(s), at least 2 required")]
    DegenerateEdge {
        /// Number of points in the rejected geometry.
        len: usize,
    },
    /// An index disagrees with the edge map.
    #[error("Index inconsistency: {0}")]
    IndexMismatch(String),
}

/// Undirected multigraph of edges keyed by id.
///
/// Uses BTreeMap/BTreeSet for deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct EdgeGraph {
    /// Edges by id.
    edges: BTreeMap<EdgeId, Edge>,
    /// Canonical pair -> edges with those endpoints.
    pairs: BTreeMap<EdgePair, BTreeSet<EdgeId>>,
    /// Point -> edges ending there.
    incidence: BTreeMap<PointId, BTreeSet<EdgeId>>,
    /// Next id to issue.
    next_id: u64,
}

impl EdgeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge, keyed by the pair of its geometry's endpoints.
    pub fn insert(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        if edge.points.len() < 2 {
            return Err(GraphError::DegenerateEdge {
                len: edge.points.len(),
            });
        }
        let pair = edge
            .pair()
            .ok_or(GraphError::DegenerateEdge { len: 0 })?;

        let id = EdgeId::new(self.next_id);
        self.next_id += 1;

        self.pairs.entry(pair).or_default().insert(id);
        for point in pair.endpoints() {
            self.incidence.entry(point).or_default().insert(id);
        }
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Remove an edge, pruning both indexes.
    pub fn remove(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(&id)?;
        if let Some(pair) = edge.pair() {
            prune(&mut self.pairs, pair, id);
            for point in pair.endpoints() {
                prune(&mut self.incidence, point, id);
            }
        }
        Some(edge)
    }

    /// Get an edge by id.
    pub fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Append an owning ring to an existing edge.
    ///
    /// Geometry is left untouched, so indexes stay valid.
    pub fn add_owner(&mut self, id: EdgeId, ring: RingId) -> bool {
        match self.edges.get_mut(&id) {
            Some(edge) => {
                edge.owners.push(ring);
                true
            }
            None => false,
        }
    }

    /// Oldest edge with the given endpoints.
    pub fn find(&self, pair: EdgePair) -> Option<EdgeId> {
        self.pairs.get(&pair).and_then(|ids| ids.iter().next().copied())
    }

    /// Number of edges sharing the given endpoints.
    pub fn multiplicity(&self, pair: EdgePair) -> usize {
        self.pairs.get(&pair).map_or(0, BTreeSet::len)
    }

    /// Number of edges ending at `point`. A closed edge counts once.
    pub fn degree(&self, point: PointId) -> usize {
        self.incidence.get(&point).map_or(0, BTreeSet::len)
    }

    /// Edges ending at `point`, with their pairs, ordered by id.
    pub fn edges_at(&self, point: PointId) -> Vec<(EdgeId, EdgePair)> {
        self.incidence
            .get(&point)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| Some((*id, self.edges.get(id)?.pair()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Incidence ids at `point` without resolving edges.
    pub(crate) fn incident_ids(&self, point: PointId) -> Vec<EdgeId> {
        self.incidence
            .get(&point)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Points that currently end at least one edge, in id order.
    pub fn points(&self) -> Vec<PointId> {
        self.incidence.keys().copied().collect()
    }

    /// `point` ends at least one edge.
    pub fn has_point(&self, point: PointId) -> bool {
        self.incidence.contains_key(&point)
    }

    /// Number of edges.
    pub fn count(&self) -> usize {
        self.edges.len()
    }

    /// Graph holds no edge.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    /// Check that both indexes agree with the edge map.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut expected_pairs: BTreeMap<EdgePair, BTreeSet<EdgeId>> = BTreeMap::new();
        let mut expected_incidence: BTreeMap<PointId, BTreeSet<EdgeId>> = BTreeMap::new();

        for (id, edge) in &self.edges {
            if edge.points.len() < 2 {
                return Err(GraphError::DegenerateEdge {
                    len: edge.points.len(),
                });
            }
            let pair = edge
                .pair()
                .ok_or(GraphError::DegenerateEdge { len: 0 })?;
            expected_pairs.entry(pair).or_default().insert(*id);
            for point in pair.endpoints() {
                expected_incidence.entry(point).or_default().insert(*id);
            }
        }

        if expected_pairs != self.pairs {
            return Err(GraphError::IndexMismatch(
                "pair index differs from edge map".to_string(),
            ));
        }
        if expected_incidence != self.incidence {
            return Err(GraphError::IndexMismatch(
                "incidence index differs from edge map".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remove `id` from `key`'s bucket, dropping the bucket when it empties.
fn prune<K: Ord>(index: &mut BTreeMap<K, BTreeSet<EdgeId>>, key: K, id: EdgeId) {
    if let Some(bucket) = index.get_mut(&key) {
        bucket.remove(&id);
        if bucket.is_empty() {
            index.remove(&key);
        }
    }
}
