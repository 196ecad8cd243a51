//! Core data models for the boundary pipeline.

pub mod feature;
pub mod geometry;
pub mod layer;

pub use feature::{
    BoundaryProperties, DerivedMetrics, Feature, FeatureCollection, FeatureId, DERIVED_KEYS,
};
pub use geometry::{BoundaryGeometry, Ring};
pub use layer::{Layer, LayerPolicy};
