//! Core types for the boundary network.

pub mod point;
pub mod ring;
pub mod edge;
pub mod diagnostic;

pub use point::{PointId, Coordinate, RingRef, Point};
pub use ring::{RingId, Level, RingMeta, Ring};
pub use edge::{EdgeId, EdgePair, Edge};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
