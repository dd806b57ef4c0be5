//! Ring types: input polygon outlines and their administrative metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::point::PointId;

/// Identity of a ring within the ring index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RingId(u32);

impl RingId {
    /// Create a ring id from its raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index into the ring index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Administrative level of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Coarse unit (city district).
    District,
    /// Fine unit nested in a district.
    SubDistrict,
}

impl Level {
    /// Parse level from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "district" => Some(Self::District),
            "sub_district" | "subdistrict" | "sub-district" => Some(Self::SubDistrict),
            _ => None,
        }
    }

    /// Upper-case tag used in ring labels.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::District => "DISTRICT",
            Self::SubDistrict => "SUB_DISTRICT",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::District => write!(f, "district"),
            Self::SubDistrict => write!(f, "sub_district"),
        }
    }
}

/// Administrative metadata attached to a ring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RingMeta {
    /// Administrative level.
    pub level: Level,
    /// Own identifier of the unit.
    pub own_id: String,
    /// Identifier of the enclosing unit (fine level only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl RingMeta {
    /// Metadata for a district ring.
    pub fn district(own_id: impl Into<String>) -> Self {
        Self {
            level: Level::District,
            own_id: own_id.into(),
            parent_id: None,
        }
    }

    /// Metadata for a sub-district ring nested in `parent_id`.
    pub fn sub_district(own_id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            level: Level::SubDistrict,
            own_id: own_id.into(),
            parent_id: Some(parent_id.into()),
        }
    }
}

/// A loaded ring: ordered point identities plus metadata.
///
/// Rings are immutable once inserted into the ring index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Identity of this ring.
    pub id: RingId,
    /// Position among the rings of the same level, in input order.
    pub ordinal: u32,
    /// Administrative metadata.
    pub meta: RingMeta,
    /// Point identities in visiting order.
    pub points: Vec<PointId>,
}

impl Ring {
    /// Source-system label, e.g. `SUB_DISTRICT_4`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.meta.level.tag(), self.ordinal)
    }

    /// First and last identities are equal.
    ///
    /// An empty ring is not closed.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Number of unique point identities visited.
    pub fn distinct_points(&self) -> usize {
        self.points.iter().collect::<BTreeSet<_>>().len()
    }
}
