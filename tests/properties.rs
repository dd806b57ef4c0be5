//! Property tests over random grids of rectangular rings.

use proptest::prelude::*;

use boundary_network::{
    build, ingest, ChainMerger, Diagnostic, Diagnostics, EdgeGraph, Identity, Level, RingRecord,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// One grid cell as a closed ring, rotated by `start` and optionally reversed.
fn cell(x: usize, y: usize, start: usize, reversed: bool) -> RingRecord {
    let (x, y) = (x as f64, y as f64);
    let mut corners = vec![[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0]];
    corners.rotate_left(start % 4);
    if reversed {
        corners.reverse();
    }
    corners.push(corners[0]);
    RingRecord {
        level: Level::SubDistrict,
        id: format!("{x}-{y}"),
        parent: Some("grid".to_string()),
        points: corners,
    }
}

fn grid_strategy() -> impl Strategy<Value = Vec<RingRecord>> {
    (1usize..5, 1usize..5)
        .prop_flat_map(|(w, h)| {
            (
                Just((w, h)),
                prop::collection::vec((any::<bool>(), 0usize..4, any::<bool>()), w * h),
            )
        })
        .prop_map(|((w, _), cells)| {
            let mut records = Vec::new();
            for (i, (keep, start, reversed)) in cells.into_iter().enumerate() {
                if keep {
                    records.push(cell(i % w, i / w, start, reversed));
                }
            }
            records
        })
}

/// Segment-owner incidences: every segment of every edge, once per owner.
fn owner_weight(graph: &EdgeGraph) -> usize {
    graph
        .iter()
        .map(|(_, e)| (e.points.len() - 1) * e.owners.len())
        .sum()
}

fn build_grid(records: &[RingRecord]) -> (EdgeGraph, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let (points, rings) = ingest(records, Identity, 15, &mut diagnostics).unwrap();
    let graph = build(&rings, &points, &mut diagnostics).unwrap();
    (graph, diagnostics)
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    /// Property: after merging, a degree-2 point only survives when an owner
    /// mismatch was reported for it.
    #[test]
    fn prop_no_mergeable_degree_two_point(records in grid_strategy()) {
        let (mut graph, mut diagnostics) = build_grid(&records);
        ChainMerger::new().merge_to_fixed_point(&mut graph, &mut diagnostics).unwrap();

        prop_assert!(graph.validate().is_ok());
        for point in graph.points() {
            if graph.degree(point) == 2 {
                let reported = diagnostics.entries().iter().any(|d| {
                    matches!(d, Diagnostic::OwnerMismatch { point: p, .. } if *p == point)
                });
                prop_assert!(reported, "unreported degree-2 point {}", point);
            }
        }
    }

    /// Property: merging never drops or invents a segment owner.
    #[test]
    fn prop_owner_weight_conserved(records in grid_strategy()) {
        let (mut graph, mut diagnostics) = build_grid(&records);
        let before = owner_weight(&graph);
        ChainMerger::new().merge_to_fixed_point(&mut graph, &mut diagnostics).unwrap();
        prop_assert_eq!(owner_weight(&graph), before);
        prop_assert_eq!(before, records.len() * 4);
    }

    /// Property: merging terminates and a second run changes nothing.
    #[test]
    fn prop_merge_terminates_and_is_idempotent(records in grid_strategy()) {
        let (mut graph, mut diagnostics) = build_grid(&records);
        let initial = graph.count();

        let summary = ChainMerger::new()
            .merge_to_fixed_point(&mut graph, &mut diagnostics)
            .unwrap();
        prop_assert!(summary.passes.len() <= initial + 1);

        let snapshot: Vec<_> = graph.iter().map(|(id, e)| (id, e.clone())).collect();
        let again = ChainMerger::new()
            .merge_to_fixed_point(&mut graph, &mut diagnostics)
            .unwrap();
        prop_assert_eq!(again.total_merges(), 0);
        let after: Vec<_> = graph.iter().map(|(id, e)| (id, e.clone())).collect();
        prop_assert_eq!(snapshot, after);
    }

    /// Property: interior grid segments are shared by exactly two rings.
    #[test]
    fn prop_shared_segments_stored_once(records in grid_strategy()) {
        let (graph, diagnostics) = build_grid(&records);
        prop_assert!(diagnostics.is_empty());
        for (_, edge) in graph.iter() {
            prop_assert_eq!(edge.points.len(), 2);
            prop_assert!(edge.owners.len() == 1 || edge.owners.len() == 2);
            prop_assert_eq!(graph.multiplicity(edge.pair().unwrap()), 1);
        }
    }
}
