//! Run configuration.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Floats are quantized to integers before hashing (see
//! [`crate::canonical::quantize`]), so `params_hash` does not depend on float
//! formatting.

use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_hash_hex, quantize};
use crate::{DEFAULT_CONFIG_VERSION, DEFAULT_KEY_PRECISION};

/// Environment variable overriding [`NetworkConfig::key_precision`].
pub const ENV_KEY_PRECISION: &str = "BOUNDARY_KEY_PRECISION";
/// Environment variable overriding [`NetworkConfig::preview_scale`].
pub const ENV_PREVIEW_SCALE: &str = "BOUNDARY_PREVIEW_SCALE";

/// Largest accepted key precision.
const MAX_KEY_PRECISION: usize = 20;

/// File names of run artifacts, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Exported network (nodes, ways, ring relations).
    pub ways: String,
    /// SVG preview of the final ways.
    pub preview: String,
    /// Operator run report.
    pub report: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            ways: "ways_v1.json".to_string(),
            preview: "ways_preview.svg".to_string(),
            report: "run_report_v1.json".to_string(),
        }
    }
}

/// Configuration of a boundary network run.
///
/// ## Parameters
///
/// - `key_precision`: fractional digits of the point key
/// - `preview_scale`: linear scale applied to lon/lat in the preview
/// - `preview_stroke_width`: polyline stroke width in the preview
/// - `artifacts`: output file names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Config version identifier.
    pub version: String,
    /// Fractional digits used when keying coordinates.
    pub key_precision: usize,
    /// Preview coordinate scale.
    pub preview_scale: f64,
    /// Preview stroke width.
    pub preview_stroke_width: f64,
    /// Artifact file names.
    pub artifacts: ArtifactPaths,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            key_precision: DEFAULT_KEY_PRECISION,
            preview_scale: 10.0,
            preview_stroke_width: 0.01,
            artifacts: ArtifactPaths::default(),
        }
    }
}

/// Quantized parameters for deterministic hashing.
#[derive(Serialize)]
struct QuantizedParams<'a> {
    version: &'a str,
    key_precision: usize,
    preview_scale: i64,
    preview_stroke_width: i64,
}

impl NetworkConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden through `lookup`. Invalid values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_KEY_PRECISION) {
            match raw.trim().parse::<usize>() {
                Ok(p) if (1..=MAX_KEY_PRECISION).contains(&p) => config.key_precision = p,
                _ => tracing::warn!(
                    variable = ENV_KEY_PRECISION,
                    value = %raw,
                    "ignoring invalid key precision"
                ),
            }
        }

        if let Some(raw) = lookup(ENV_PREVIEW_SCALE) {
            match raw.trim().parse::<f64>() {
                Ok(s) if s.is_finite() && s > 0.0 => config.preview_scale = s,
                _ => tracing::warn!(
                    variable = ENV_PREVIEW_SCALE,
                    value = %raw,
                    "ignoring invalid preview scale"
                ),
            }
        }

        config
    }

    /// Compute a hash of the parameters that influence outputs.
    pub fn params_hash(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(&QuantizedParams {
            version: &self.version,
            key_precision: self.key_precision,
            preview_scale: quantize(self.preview_scale),
            preview_stroke_width: quantize(self.preview_stroke_width),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.key_precision, 15);
        assert_eq!(config.preview_scale, 10.0);
        assert_eq!(config.artifacts.preview, "ways_preview.svg");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = NetworkConfig::from_lookup(lookup(&[
            (ENV_KEY_PRECISION, "9"),
            (ENV_PREVIEW_SCALE, "2.5"),
        ]));
        assert_eq!(config.key_precision, 9);
        assert_eq!(config.preview_scale, 2.5);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = NetworkConfig::from_lookup(lookup(&[
            (ENV_KEY_PRECISION, "0"),
            (ENV_PREVIEW_SCALE, "-3"),
        ]));
        assert_eq!(config, NetworkConfig::default());

        let config = NetworkConfig::from_lookup(lookup(&[(ENV_KEY_PRECISION, "fifteen")]));
        assert_eq!(config.key_precision, 15);
    }

    #[test]
    fn test_params_hash_determinism() {
        let a = NetworkConfig::default();
        let b = NetworkConfig::default();
        assert_eq!(a.params_hash().unwrap(), b.params_hash().unwrap());
    }

    #[test]
    fn test_params_hash_changes() {
        let a = NetworkConfig::default();
        let mut b = NetworkConfig::default();
        b.key_precision = 12;
        assert_ne!(a.params_hash().unwrap(), b.params_hash().unwrap());
    }

    #[test]
    fn test_artifact_names_do_not_affect_hash() {
        let a = NetworkConfig::default();
        let mut b = NetworkConfig::default();
        b.artifacts.ways = "other.json".to_string();
        assert_eq!(a.params_hash().unwrap(), b.params_hash().unwrap());
    }
}
