//! SVG preview of the final ways.
//!
//! One `<polyline>` per edge, in edge-id order, with every point drawn at
//! `(lon * scale, lat * scale)`. The picture is meant for eyeballing, so no
//! axis flip or viewBox fitting is applied.

use std::fmt::Write as _;

use crate::config::NetworkConfig;
use crate::graph::EdgeGraph;
use crate::store::PointStore;
use crate::types::{EdgeId, PointId};

/// Error type for preview rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    /// A way references a point missing from the store.
    #[error("Way {way} references unknown point {point}")]
    UnknownPoint {
        /// Offending way.
        way: EdgeId,
        /// Missing point.
        point: PointId,
    },
}

/// Render all edges of `graph` as an SVG document.
pub fn render_svg(
    graph: &EdgeGraph,
    points: &PointStore,
    config: &NetworkConfig,
) -> Result<String, PreviewError> {
    let mut svg = String::from("<svg xmlns=\"http://www.w3.org/2000/svg\">\n");

    for (id, edge) in graph.iter() {
        let mut coords = Vec::with_capacity(edge.points.len());
        for point in &edge.points {
            let record = points
                .get(*point)
                .ok_or(PreviewError::UnknownPoint { way: id, point: *point })?;
            coords.push(format!(
                "{},{}",
                record.coord.lon * config.preview_scale,
                record.coord.lat * config.preview_scale
            ));
        }
        // Writing into a String cannot fail.
        let _ = writeln!(
            svg,
            "  <polyline id=\"{}\" points=\"{}\" fill=\"none\" stroke=\"black\" stroke-width=\"{}\"/>",
            id,
            coords.join(" "),
            config.preview_stroke_width
        );
    }

    svg.push_str("</svg>\n");
    tracing::debug!(polylines = graph.count(), "preview rendered");
    Ok(svg)
}
