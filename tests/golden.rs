//! Golden tests for the boundary network.
//!
//! These tests pin the merged network of small hand-checked layouts and the
//! determinism of the exported fingerprint.

use boundary_network::{
    Coordinate, Diagnostics, EdgePair, Identity, Level, NetworkExport, Pipeline, PointId,
    RingRecord,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn ring(level: Level, id: &str, parent: Option<&str>, points: &[(f64, f64)]) -> RingRecord {
    RingRecord {
        level,
        id: id.to_string(),
        parent: parent.map(str::to_string),
        points: points.iter().map(|&(x, y)| [x, y]).collect(),
    }
}

/// Two unit squares sharing the segment (1,0)-(1,1).
fn two_squares() -> Vec<RingRecord> {
    vec![
        ring(
            Level::District,
            "West",
            None,
            &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)],
        ),
        ring(
            Level::District,
            "East",
            None,
            &[(1.0, 0.0), (1.0, 1.0), (2.0, 1.0), (2.0, 0.0), (1.0, 0.0)],
        ),
    ]
}

fn point_at(run: &boundary_network::NetworkRun, lon: f64, lat: f64) -> PointId {
    run.points
        .lookup(Coordinate::new(lon, lat))
        .expect("point interned")
}

fn coords(run: &boundary_network::NetworkRun, ids: &[PointId]) -> Vec<(f64, f64)> {
    ids.iter()
        .map(|id| {
            let p = run.points.get(*id).expect("point exists");
            (p.coord.lon, p.coord.lat)
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Two Squares
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_two_squares_shared_edge() {
    let run = Pipeline::default().run(&two_squares(), &Identity).unwrap();

    assert_eq!(run.report.unique_points, 6);
    assert_eq!(run.report.initial_edges, 7);
    assert_eq!(run.report.final_edges, 3);
    assert!(run.diagnostics.is_empty());

    let bottom = point_at(&run, 1.0, 0.0);
    let top = point_at(&run, 1.0, 1.0);
    let shared = EdgePair::new(bottom, top);

    // The shared segment plus one outer chain per square.
    assert_eq!(run.graph.multiplicity(shared), 3);
    assert_eq!(run.graph.degree(bottom), 3);
    assert_eq!(run.graph.degree(top), 3);
    assert_eq!(run.graph.points(), {
        let mut expected = vec![bottom, top];
        expected.sort();
        expected
    });

    let short: Vec<_> = run
        .graph
        .iter()
        .filter(|(_, e)| e.points.len() == 2)
        .collect();
    assert_eq!(short.len(), 1);
    let (_, segment) = short[0];
    let west = run.rings.iter().next().unwrap().id;
    let east = run.rings.iter().nth(1).unwrap().id;
    assert_eq!(segment.sorted_owners(), vec![west, east]);
}

#[test]
fn test_two_squares_outer_chains() {
    let run = Pipeline::default().run(&two_squares(), &Identity).unwrap();

    let chains: Vec<Vec<(f64, f64)>> = run
        .graph
        .iter()
        .filter(|(_, e)| e.points.len() == 4)
        .map(|(_, e)| coords(&run, &e.points))
        .collect();

    assert_eq!(
        chains,
        vec![
            vec![(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)],
            vec![(1.0, 1.0), (2.0, 1.0), (2.0, 0.0), (1.0, 0.0)],
        ]
    );
}

#[test]
fn test_two_squares_export() {
    let run = Pipeline::default().run(&two_squares(), &Identity).unwrap();
    let export = NetworkExport::from_run(&run).unwrap();

    assert_eq!(export.nodes.len(), 6);
    assert_eq!(export.ways.len(), 3);
    assert_eq!(export.relations.len(), 2);
    assert_eq!(export.relations[0].label, "DISTRICT_0");
    assert_eq!(export.relations[1].label, "DISTRICT_1");
    for relation in &export.relations {
        assert_eq!(relation.ways.len(), 2);
    }
    assert!(export.ways.iter().all(|w| !w.closed));
    assert_eq!(export.fingerprint, run.report.fingerprint);
}

// ─────────────────────────────────────────────────────────────────────────────
// Nested Levels
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sub_district_inside_district() {
    // A district split into two sub-districts along x = 1.
    let records = vec![
        ring(
            Level::District,
            "Mitte",
            None,
            &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0), (0.0, 0.0)],
        ),
        ring(
            Level::SubDistrict,
            "Alt",
            Some("Mitte"),
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)],
        ),
        ring(
            Level::SubDistrict,
            "Neu",
            Some("Mitte"),
            &[(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
        ),
    ];
    let run = Pipeline::default().run(&records, &Identity).unwrap();

    // The district ring has no vertex at x = 1, so its long segments do not
    // coincide with the sub-district ones.
    assert!(run.graph.validate().is_ok());
    let labels: Vec<String> = run.rings.iter().map(|r| r.label()).collect();
    assert_eq!(labels, vec!["DISTRICT_0", "SUB_DISTRICT_0", "SUB_DISTRICT_1"]);

    let export = NetworkExport::from_run(&run).unwrap();
    assert_eq!(export.relations[1].parent_id.as_deref(), Some("Mitte"));
    assert!(export.relations.iter().all(|r| !r.ways.is_empty()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_fingerprint_determinism() {
    let pipeline = Pipeline::default();
    let a = pipeline.run(&two_squares(), &Identity).unwrap();
    let b = pipeline.run(&two_squares(), &Identity).unwrap();

    assert_eq!(a.report.fingerprint, b.report.fingerprint);
    assert_eq!(a.report.passes, b.report.passes);
}

#[test]
fn test_fingerprint_tracks_input() {
    let pipeline = Pipeline::default();
    let a = pipeline.run(&two_squares(), &Identity).unwrap();

    let mut moved = two_squares();
    moved[1].points[2] = [2.5, 1.0];
    let b = pipeline.run(&moved, &Identity).unwrap();

    assert_ne!(a.report.fingerprint, b.report.fingerprint);
}

#[test]
fn test_second_merge_is_noop() {
    let mut run = Pipeline::default().run(&two_squares(), &Identity).unwrap();
    let before: Vec<_> = run.graph.iter().map(|(id, e)| (id, e.clone())).collect();

    let summary =
        boundary_network::merge_to_fixed_point(&mut run.graph, &mut Diagnostics::new()).unwrap();

    assert_eq!(summary.total_merges(), 0);
    let after: Vec<_> = run.graph.iter().map(|(id, e)| (id, e.clone())).collect();
    assert_eq!(before, after);
}
