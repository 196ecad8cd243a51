//! Level-of-detail pipeline for boundary outer rings.
//!
//! Measures each feature's outer ring with a bounding-box area proxy,
//! simplifies dense rings according to the layer policy and stamps
//! the derived metrics used to pick a rendering treatment.

pub mod area;
pub mod classify;
pub mod distance;
pub mod processor;
pub mod simplify;

pub use area::{bbox_area, bounding_box, Bbox};
pub use classify::{is_small_feature, small_features, SMALL_FEATURE_AREA};
pub use distance::perpendicular_distance;
pub use processor::{
    process_collection, process_collection_par, process_collection_with_policy, process_feature,
    LayerSummary,
};
pub use simplify::{simplify_if_needed, simplify_polyline, simplify_ring};
