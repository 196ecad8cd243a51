//! Administrative layers and their simplification policies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Administrative granularity level of a boundary dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// First-level divisions (admin1)
    Regions,
    /// Second-level divisions (admin2)
    Provinces,
    /// Third-level divisions (admin3)
    Communes,
}

impl Layer {
    /// Get all layers, coarsest first
    pub fn all() -> &'static [Layer] {
        &[Layer::Regions, Layer::Provinces, Layer::Communes]
    }

    /// File stem of the layer's dataset (`<data_dir>/<stem>.geojson`)
    pub fn file_stem(&self) -> &'static str {
        match self {
            Layer::Regions => "regions",
            Layer::Provinces => "provinces",
            Layer::Communes => "communes",
        }
    }

    /// Simplification policy applied to outer rings of this layer.
    ///
    /// Regions are never simplified. Provinces and communes carry dense
    /// boundaries, so rings above a few hundred points get reduced.
    pub fn policy(&self) -> LayerPolicy {
        match self {
            Layer::Regions => LayerPolicy {
                threshold: usize::MAX,
                tolerance: 0.001,
            },
            Layer::Provinces => LayerPolicy {
                threshold: 1500,
                tolerance: 0.001,
            },
            Layer::Communes => LayerPolicy {
                threshold: 800,
                tolerance: 0.0005,
            },
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for Layer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regions" => Ok(Layer::Regions),
            "provinces" => Ok(Layer::Provinces),
            "communes" => Ok(Layer::Communes),
            _ => Err(Error::UnknownLayer(s.to_string())),
        }
    }
}

/// Point-count gate and tolerance for ring simplification.
///
/// A ring is simplified only when its point count is strictly greater
/// than `threshold`. Tolerance is in source degree units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerPolicy {
    pub threshold: usize,
    pub tolerance: f64,
}

impl LayerPolicy {
    pub fn new(threshold: usize, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                value: tolerance.to_string(),
                reason: "must be a finite, non-negative number".to_string(),
            });
        }
        Ok(Self {
            threshold,
            tolerance,
        })
    }

    /// Whether a ring with `point_count` points gets simplified
    pub fn should_simplify(&self, point_count: usize) -> bool {
        point_count > self.threshold
    }
}
