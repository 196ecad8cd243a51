//! Boundary geometry with GeoJSON `[x, y]` position encoding.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

/// Ordered sequence of points; closed when first == last.
pub type Ring = Vec<Coord<f64>>;

/// Polygonal boundary geometry.
///
/// Only the outer ring of the first polygon takes part in processing.
/// Holes and additional polygon parts are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundaryGeometry {
    Polygon {
        #[serde(with = "positions::polygon")]
        coordinates: Vec<Ring>,
    },
    MultiPolygon {
        #[serde(with = "positions::multi_polygon")]
        coordinates: Vec<Vec<Ring>>,
    },
}

impl BoundaryGeometry {
    /// Outer ring of the primary polygon, empty if the geometry has none
    pub fn outer_ring(&self) -> &[Coord<f64>] {
        let ring = match self {
            BoundaryGeometry::Polygon { coordinates } => coordinates.first(),
            BoundaryGeometry::MultiPolygon { coordinates } => {
                coordinates.first().and_then(|rings| rings.first())
            }
        };
        ring.map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn outer_ring_mut(&mut self) -> Option<&mut Ring> {
        match self {
            BoundaryGeometry::Polygon { coordinates } => coordinates.first_mut(),
            BoundaryGeometry::MultiPolygon { coordinates } => {
                coordinates.first_mut().and_then(|rings| rings.first_mut())
            }
        }
    }

    /// Total number of rings across all polygon parts
    pub fn ring_count(&self) -> usize {
        match self {
            BoundaryGeometry::Polygon { coordinates } => coordinates.len(),
            BoundaryGeometry::MultiPolygon { coordinates } => {
                coordinates.iter().map(Vec::len).sum()
            }
        }
    }

    /// Convert to a `geo` multipolygon for downstream spatial algorithms.
    pub fn to_geo(&self) -> MultiPolygon<f64> {
        fn polygon(rings: &[Ring]) -> Option<Polygon<f64>> {
            let (exterior, interiors) = rings.split_first()?;
            Some(Polygon::new(
                LineString::new(exterior.clone()),
                interiors
                    .iter()
                    .map(|ring| LineString::new(ring.clone()))
                    .collect(),
            ))
        }

        match self {
            BoundaryGeometry::Polygon { coordinates } => {
                MultiPolygon::new(polygon(coordinates).into_iter().collect())
            }
            BoundaryGeometry::MultiPolygon { coordinates } => MultiPolygon::new(
                coordinates
                    .iter()
                    .filter_map(|rings| polygon(rings))
                    .collect(),
            ),
        }
    }
}

/// Serde adapters between `Coord<f64>` rings and GeoJSON position arrays.
mod positions {
    use geo::Coord;
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};

    use super::Ring;

    /// A GeoJSON position; extra ordinates (altitude) are dropped.
    struct Position(Coord<f64>);

    impl<'de> Deserialize<'de> for Position {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let ordinates = Vec::<f64>::deserialize(deserializer)?;
            if ordinates.len() < 2 {
                return Err(de::Error::invalid_length(
                    ordinates.len(),
                    &"a position with at least two ordinates",
                ));
            }
            Ok(Position(Coord {
                x: ordinates[0],
                y: ordinates[1],
            }))
        }
    }

    struct RingRef<'a>(&'a [Coord<f64>]);

    impl Serialize for RingRef<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.0.iter().map(|c| [c.x, c.y]))
        }
    }

    struct PolygonRef<'a>(&'a [Ring]);

    impl Serialize for PolygonRef<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.0.iter().map(|ring| RingRef(ring)))
        }
    }

    fn into_rings(raw: Vec<Vec<Position>>) -> Vec<Ring> {
        raw.into_iter()
            .map(|ring| ring.into_iter().map(|p| p.0).collect())
            .collect()
    }

    pub mod polygon {
        use super::*;

        pub fn serialize<S: Serializer>(rings: &[Ring], serializer: S) -> Result<S::Ok, S::Error> {
            PolygonRef(rings).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Ring>, D::Error> {
            let raw = Vec::<Vec<Position>>::deserialize(deserializer)?;
            Ok(into_rings(raw))
        }
    }

    pub mod multi_polygon {
        use super::*;

        pub fn serialize<S: Serializer>(
            polygons: &[Vec<Ring>],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(polygons.iter().map(|rings| PolygonRef(rings)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Vec<Ring>>, D::Error> {
            let raw = Vec::<Vec<Vec<Position>>>::deserialize(deserializer)?;
            Ok(raw.into_iter().map(into_rings).collect())
        }
    }
}
