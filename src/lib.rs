//! # boundary-network
//!
//! Deterministic conversion of administrative boundary rings into a
//! non-redundant network of shared boundary ways.
//!
//! The crate answers one question:
//!
//! > Given every boundary ring of a set of adjacent units, which maximal
//! > polylines separate exactly the same set of units?
//!
//! ## Core Contract
//!
//! 1. Intern every reprojected coordinate into a unique point
//! 2. Store each segment shared by several rings exactly once, with all owners
//! 3. Fuse chains through points of degree two until nothing changes
//! 4. Export the result as a stable, ordered, fingerprinted document
//!
//! ## Architecture
//!
//! ```text
//! RingRecord → Ingestor → PointStore + RingIndex → builder → EdgeGraph
//!                                                              ↓
//!                         NetworkExport / SVG preview ← ChainMerger
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same input + same config → identical fingerprint
//! - Point ids follow first appearance in input order
//! - Edge ids are issued monotonically and never reused
//! - Merge passes visit points in id order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod ingest;
pub mod graph;
pub mod builder;
pub mod merger;
pub mod pipeline;
pub mod export;
pub mod preview;
pub mod config;
pub mod canonical;

// Re-exports
pub use types::{
    Coordinate, Diagnostic, DiagnosticKind, Diagnostics, Edge, EdgeId, EdgePair, Level, Point,
    PointId, Ring, RingId, RingMeta, RingRef,
};
pub use store::{PointStore, RingIndex};
pub use ingest::{ingest, Identity, IngestError, Ingestor, Reprojection, RingFile, RingRecord};
pub use graph::{EdgeGraph, GraphError};
pub use builder::{build, BuildError};
pub use merger::{fuse, merge_to_fixed_point, ChainMerger, MergeError, MergeSummary, PassStats};
pub use pipeline::{NetworkRun, Pipeline, PipelineError, RunReport, WrittenArtifacts};
pub use export::{ExportError, ExportNode, ExportRelation, ExportWay, NetworkExport};
pub use preview::{render_svg, PreviewError};
pub use config::{ArtifactPaths, NetworkConfig};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};

/// Schema version of exported documents and run reports.
/// Increment on breaking changes to any serialized type.
pub const NETWORK_SCHEMA_VERSION: &str = "1.0.0";

/// Default config version identifier.
pub const DEFAULT_CONFIG_VERSION: &str = "network_config_v1";

/// Default fractional digits of the point key.
pub const DEFAULT_KEY_PRECISION: usize = 15;
