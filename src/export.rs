//! Export of the final network for an interchange serializer.
//!
//! The export is a flat, ordered document: nodes (every point used by a final
//! way), ways (final edges) and one relation per ring listing the ways on its
//! boundary. A fingerprint over all three makes runs comparable.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::canonical::canonical_hash_hex;
use crate::graph::EdgeGraph;
use crate::pipeline::NetworkRun;
use crate::store::{PointStore, RingIndex};
use crate::types::{EdgeId, Level, PointId, RingId};
use crate::NETWORK_SCHEMA_VERSION;

/// Error type for export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A way references a point missing from the store.
    #[error("Way {way} references unknown point {point}")]
    UnknownPoint {
        /// Offending way.
        way: EdgeId,
        /// Missing point.
        point: PointId,
    },
    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A node of the exported network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    /// Point identity.
    pub id: PointId,
    /// Longitude.
    pub lon: f64,
    /// Latitude.
    pub lat: f64,
}

/// A way of the exported network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportWay {
    /// Edge identity.
    pub id: EdgeId,
    /// Node ids in stored order.
    pub nodes: Vec<PointId>,
    /// Rings whose boundary uses this way.
    pub owners: Vec<RingId>,
    /// First and last node coincide.
    pub closed: bool,
}

/// Boundary relation of one ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRelation {
    /// Ring identity.
    pub ring: RingId,
    /// Source label.
    pub label: String,
    /// Administrative level.
    pub level: Level,
    /// Own id of the unit.
    pub own_id: String,
    /// Enclosing unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Ways on this ring's boundary, ordered by id.
    pub ways: Vec<EdgeId>,
}

/// Exported network document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkExport {
    /// Schema version.
    pub schema_version: String,
    /// xxh64 over nodes, ways and relations.
    pub fingerprint: String,
    /// Nodes ordered by id.
    pub nodes: Vec<ExportNode>,
    /// Ways ordered by id.
    pub ways: Vec<ExportWay>,
    /// Relations ordered by ring id.
    pub relations: Vec<ExportRelation>,
}

/// Hash input; coordinates enter as raw bits.
#[derive(Serialize)]
struct FingerprintInput<'a> {
    schema_version: &'a str,
    nodes: Vec<(PointId, u64, u64)>,
    ways: &'a [ExportWay],
    relations: &'a [ExportRelation],
}

impl NetworkExport {
    /// Export the current state of `graph`.
    pub fn build(
        points: &PointStore,
        rings: &RingIndex,
        graph: &EdgeGraph,
    ) -> Result<Self, ExportError> {
        let mut used: BTreeSet<PointId> = BTreeSet::new();
        let mut members: BTreeMap<RingId, BTreeSet<EdgeId>> = BTreeMap::new();
        let mut ways = Vec::with_capacity(graph.count());

        for (id, edge) in graph.iter() {
            used.extend(edge.points.iter().copied());
            for owner in &edge.owners {
                members.entry(*owner).or_default().insert(id);
            }
            ways.push(ExportWay {
                id,
                nodes: edge.points.clone(),
                owners: edge.owners.clone(),
                closed: edge.pair().is_some_and(|p| p.is_loop()),
            });
        }

        let mut nodes = Vec::with_capacity(used.len());
        for point in used {
            let Some(record) = points.get(point) else {
                let way = ways
                    .iter()
                    .find(|w| w.nodes.contains(&point))
                    .map_or(EdgeId::new(0), |w| w.id);
                return Err(ExportError::UnknownPoint { way, point });
            };
            nodes.push(ExportNode {
                id: point,
                lon: record.coord.lon,
                lat: record.coord.lat,
            });
        }

        let relations: Vec<ExportRelation> = rings
            .iter()
            .map(|ring| ExportRelation {
                ring: ring.id,
                label: ring.label(),
                level: ring.meta.level,
                own_id: ring.meta.own_id.clone(),
                parent_id: ring.meta.parent_id.clone(),
                ways: members
                    .get(&ring.id)
                    .map(|ids| ids.iter().copied().collect())
                    .unwrap_or_default(),
            })
            .collect();

        let mut export = Self {
            schema_version: NETWORK_SCHEMA_VERSION.to_string(),
            fingerprint: String::new(),
            nodes,
            ways,
            relations,
        };
        export.fingerprint = export.compute_fingerprint()?;
        Ok(export)
    }

    /// Export the final graph of a pipeline run.
    pub fn from_run(run: &NetworkRun) -> Result<Self, ExportError> {
        Self::build(&run.points, &run.rings, &run.graph)
    }

    /// Recompute the fingerprint from the document contents.
    pub fn compute_fingerprint(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(&FingerprintInput {
            schema_version: &self.schema_version,
            nodes: self
                .nodes
                .iter()
                .map(|n| (n.id, n.lon.to_bits(), n.lat.to_bits()))
                .collect(),
            ways: &self.ways,
            relations: &self.relations,
        })
    }

    /// The stored fingerprint matches the contents.
    pub fn verify(&self) -> Result<bool, serde_json::Error> {
        Ok(self.compute_fingerprint()? == self.fingerprint)
    }

    /// Pretty JSON rendering.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
