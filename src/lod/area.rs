//! Bounding-box area proxy.
//!
//! Classification cutoffs are tuned against this proxy rather than the true
//! polygon area, so it is not a candidate for a shoelace replacement.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Axis-aligned extent in source degree units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bbox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Grow to cover another box
    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Extent of a ring in a single pass; `None` for an empty ring
pub fn bounding_box(ring: &[Coord<f64>]) -> Option<Bbox> {
    let (first, rest) = ring.split_first()?;
    let start = Bbox {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    Some(rest.iter().fold(start, |b, c| Bbox {
        min_x: b.min_x.min(c.x),
        min_y: b.min_y.min(c.y),
        max_x: b.max_x.max(c.x),
        max_y: b.max_y.max(c.y),
    }))
}

/// `(max_x - min_x) * (max_y - min_y)` of the ring; 0 for empty rings
pub fn bbox_area(ring: &[Coord<f64>]) -> f64 {
    bounding_box(ring).map_or(0.0, |b| b.area())
}
