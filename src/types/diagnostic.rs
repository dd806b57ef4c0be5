//! Non-fatal data-quality diagnostics.
//!
//! ## Purpose
//!
//! Warnings never interrupt processing. Each stage records them into a
//! shared [`Diagnostics`] accumulator; the pipeline reports them in
//! aggregate once the run completes.
//!
//! | Diagnostic | Kind | Stage | Effect |
//! |------------|------|-------|--------|
//! | UnclosedRing | unclosed_ring | ingest | ring processed as given |
//! | DegenerateRing | degenerate_ring | ingest | ring yields no edges |
//! | GeometryMismatch | metadata_mismatch | build | stored geometry kept |
//! | OwnerMismatch | metadata_mismatch | merge | merge skipped |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::edge::EdgePair;
use super::point::PointId;
use super::ring::RingId;

/// Aggregation bucket of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// First and last ring points differ.
    UnclosedRing,
    /// Ring has fewer than two distinct points.
    DegenerateRing,
    /// Inconsistent edge attribution or geometry.
    MetadataMismatch,
}

impl DiagnosticKind {
    /// Stable snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnclosedRing => "unclosed_ring",
            Self::DegenerateRing => "degenerate_ring",
            Self::MetadataMismatch => "metadata_mismatch",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single data-quality warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A ring's first and last points differ after interning.
    UnclosedRing {
        /// Offending ring.
        ring: RingId,
        /// Source label of the ring.
        label: String,
        /// First point.
        first: PointId,
        /// Last point.
        last: PointId,
    },
    /// A ring cannot contribute any edge.
    DegenerateRing {
        /// Offending ring.
        ring: RingId,
        /// Source label of the ring.
        label: String,
        /// Number of distinct points the ring visits.
        distinct_points: usize,
    },
    /// An existing edge was revisited with a different geometry than stored.
    GeometryMismatch {
        /// Canonical pair of the stored edge.
        pair: EdgePair,
        /// Ring revisiting the edge.
        ring: RingId,
        /// Stored geometry.
        stored: Vec<PointId>,
        /// Observed geometry.
        observed: Vec<PointId>,
    },
    /// Two edges meeting at a pass-through point are owned by different rings.
    OwnerMismatch {
        /// The pass-through point.
        point: PointId,
        /// Sorted owners of the first edge.
        left: Vec<RingId>,
        /// Sorted owners of the second edge.
        right: Vec<RingId>,
    },
}

impl Diagnostic {
    /// Aggregation bucket of this diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::UnclosedRing { .. } => DiagnosticKind::UnclosedRing,
            Self::DegenerateRing { .. } => DiagnosticKind::DegenerateRing,
            Self::GeometryMismatch { .. } | Self::OwnerMismatch { .. } => {
                DiagnosticKind::MetadataMismatch
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedRing { label, first, last, .. } => {
                write!(f, "ring {label} is not closed (first {first}, last {last})")
            }
            Self::DegenerateRing { label, distinct_points, .. } => {
                write!(f, "ring {label} visits only {distinct_points} distinct point(s)")
            }
            Self::GeometryMismatch { pair, ring, stored, observed } => write!(
                f,
                "edge {pair} revisited by {ring} as {observed:?}, stored as {stored:?}"
            ),
            Self::OwnerMismatch { point, left, right } => write!(
                f,
                "edges at {point} have different owners: {left:?} vs {right:?}"
            ),
        }
    }
}

/// Accumulator for warnings raised during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(kind = %diagnostic.kind(), "{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// All recorded diagnostics, in recording order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No diagnostic was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind() == kind)
    }

    /// Count per kind, for aggregate reporting.
    pub fn counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Emit one aggregate warning per kind.
    pub fn log_summary(&self) {
        for (kind, count) in self.counts() {
            tracing::warn!(kind = %kind, count = count, "data-quality warnings recorded");
        }
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unclosed(ring: u32) -> Diagnostic {
        Diagnostic::UnclosedRing {
            ring: RingId::new(ring),
            label: format!("DISTRICT_{ring}"),
            first: PointId::new(0),
            last: PointId::new(1),
        }
    }

    #[test]
    fn test_mismatch_variants_share_kind() {
        let owner = Diagnostic::OwnerMismatch {
            point: PointId::new(1),
            left: vec![RingId::new(0)],
            right: vec![RingId::new(1)],
        };
        let geometry = Diagnostic::GeometryMismatch {
            pair: EdgePair::new(PointId::new(0), PointId::new(1)),
            ring: RingId::new(2),
            stored: vec![PointId::new(0), PointId::new(1)],
            observed: vec![PointId::new(0), PointId::new(2)],
        };
        assert_eq!(owner.kind(), DiagnosticKind::MetadataMismatch);
        assert_eq!(geometry.kind(), DiagnosticKind::MetadataMismatch);
    }

    #[test]
    fn test_counts_aggregate_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(unclosed(0));
        diagnostics.push(unclosed(1));
        diagnostics.push(Diagnostic::DegenerateRing {
            ring: RingId::new(2),
            label: "DISTRICT_2".to_string(),
            distinct_points: 1,
        });

        let counts = diagnostics.counts();
        assert_eq!(counts[&DiagnosticKind::UnclosedRing], 2);
        assert_eq!(counts[&DiagnosticKind::DegenerateRing], 1);
        assert!(!counts.contains_key(&DiagnosticKind::MetadataMismatch));
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnclosedRing).count(), 2);
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(unclosed(3)).unwrap();
        assert_eq!(json["type"], "unclosed_ring");
        assert_eq!(json["label"], "DISTRICT_3");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            unclosed(0).to_string(),
            "ring DISTRICT_0 is not closed (first p0, last p1)"
        );
    }
}
