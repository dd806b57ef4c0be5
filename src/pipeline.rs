//! End-to-end driver: ingest, build, merge, report.
//!
//! ```text
//! RingRecord* → Ingestor → (PointStore, RingIndex) → builder → EdgeGraph
//!                                                               ↓
//!                          NetworkExport ← RunReport ← ChainMerger
//! ```
//!
//! Warnings accumulate in one [`Diagnostics`] value across all stages and are
//! logged in aggregate once the run completes. Any stage error aborts the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::builder::{self, BuildError};
use crate::config::NetworkConfig;
use crate::export::{ExportError, NetworkExport};
use crate::graph::EdgeGraph;
use crate::ingest::{self, IngestError, Reprojection, RingRecord};
use crate::merger::{ChainMerger, MergeError, PassStats};
use crate::preview::{self, PreviewError};
use crate::store::{PointStore, RingIndex};
use crate::types::Diagnostics;
use crate::NETWORK_SCHEMA_VERSION;

/// Error type for a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Ingestion failed.
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// Edge extraction failed.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Merge aborted on an integrity error.
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// Export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Preview rendering failed.
    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),

    /// Reading input or writing an artifact failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operator-facing summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version.
    pub schema_version: String,
    /// Config version used.
    pub config_version: String,
    /// Hash of output-affecting parameters.
    pub params_hash: String,
    /// Unique points after interning.
    pub unique_points: usize,
    /// Rings ingested.
    pub rings: usize,
    /// Edges produced by the builder.
    pub initial_edges: usize,
    /// Merge passes, in order.
    pub passes: Vec<PassStats>,
    /// Edges after the last pass.
    pub final_edges: usize,
    /// Warning counts keyed by kind.
    pub warnings: BTreeMap<String, usize>,
    /// Fingerprint of the exported network.
    pub fingerprint: String,
    /// Completion time. Not part of any fingerprint.
    pub completed_at: DateTime<Utc>,
}

impl RunReport {
    /// Total warnings.
    pub fn total_warnings(&self) -> usize {
        self.warnings.values().sum()
    }

    /// Total successful merges.
    pub fn total_merges(&self) -> usize {
        self.passes.iter().map(|p| p.merges).sum()
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct NetworkRun {
    /// Interned points.
    pub points: PointStore,
    /// Loaded rings.
    pub rings: RingIndex,
    /// Final graph.
    pub graph: EdgeGraph,
    /// Operator report.
    pub report: RunReport,
    /// All warnings, in emission order.
    pub diagnostics: Diagnostics,
}

/// Paths of written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    /// Exported network.
    pub ways: PathBuf,
    /// SVG preview.
    pub preview: PathBuf,
    /// Run report.
    pub report: PathBuf,
}

/// Boundary network pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: NetworkConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Run all stages over `records`.
    pub fn run<R: Reprojection>(
        &self,
        records: &[RingRecord],
        reprojection: &R,
    ) -> Result<NetworkRun, PipelineError> {
        let mut diagnostics = Diagnostics::new();

        let (points, rings) = ingest::ingest(
            records,
            |x: f64, y: f64| reprojection.reproject(x, y),
            self.config.key_precision,
            &mut diagnostics,
        )?;

        let mut graph = builder::build(&rings, &points, &mut diagnostics)?;
        let initial_edges = graph.count();

        let summary = ChainMerger::new().merge_to_fixed_point(&mut graph, &mut diagnostics)?;

        let export = NetworkExport::build(&points, &rings, &graph)?;

        let report = RunReport {
            schema_version: NETWORK_SCHEMA_VERSION.to_string(),
            config_version: self.config.version.clone(),
            params_hash: self.config.params_hash()?,
            unique_points: points.len(),
            rings: rings.len(),
            initial_edges,
            passes: summary.passes,
            final_edges: graph.count(),
            warnings: diagnostics
                .counts()
                .into_iter()
                .map(|(kind, count)| (kind.as_str().to_string(), count))
                .collect(),
            fingerprint: export.fingerprint,
            completed_at: Utc::now(),
        };

        diagnostics.log_summary();
        tracing::info!(
            unique_points = report.unique_points,
            rings = report.rings,
            initial_edges = report.initial_edges,
            final_edges = report.final_edges,
            warnings = report.total_warnings(),
            fingerprint = %report.fingerprint,
            "network run complete"
        );

        Ok(NetworkRun {
            points,
            rings,
            graph,
            report,
            diagnostics,
        })
    }

    /// Read a ring file from disk and run it.
    pub fn run_file<R: Reprojection>(
        &self,
        path: &Path,
        reprojection: &R,
    ) -> Result<NetworkRun, PipelineError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = ingest::RingFile::from_json(&raw)?;
        self.run(&file.rings, reprojection)
    }

    /// Write export, preview and report into `dir`.
    pub fn write_artifacts(
        &self,
        run: &NetworkRun,
        dir: &Path,
    ) -> Result<WrittenArtifacts, PipelineError> {
        let artifacts = &self.config.artifacts;
        let written = WrittenArtifacts {
            ways: dir.join(&artifacts.ways),
            preview: dir.join(&artifacts.preview),
            report: dir.join(&artifacts.report),
        };

        let export = NetworkExport::from_run(run)?;
        write_file(&written.ways, &export.to_json_pretty()?)?;
        write_file(
            &written.preview,
            &preview::render_svg(&run.graph, &run.points, &self.config)?,
        )?;
        write_file(&written.report, &serde_json::to_string_pretty(&run.report)?)?;

        tracing::info!(dir = %dir.display(), "artifacts written");
        Ok(written)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), PipelineError> {
    std::fs::write(path, contents).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
