//! Ingestion-time stores: unique points and loaded rings.
//!
//! Both are built once from input and are read-only afterwards.

pub mod points;
pub mod rings;

pub use points::PointStore;
pub use rings::RingIndex;
