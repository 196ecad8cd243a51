//! Faso LOD - level-of-detail preparation for administrative boundaries
//!
//! This library measures, simplifies and classifies boundary polygons so a
//! map client can render each administrative layer at a sensible cost.

pub mod error;
pub mod loader;
pub mod lod;
pub mod models;

pub use error::{Error, Result};
pub use models::{Feature, FeatureCollection, Layer, LayerPolicy};
