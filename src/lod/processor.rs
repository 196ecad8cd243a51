//! Per-feature measurement, simplification and annotation.

use std::borrow::Cow;

use geo::BoundingRect;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, enabled, info, Level};

use super::area::{bbox_area, Bbox};
use super::classify::is_small_feature;
use super::simplify::simplify_if_needed;
use crate::models::{DerivedMetrics, Feature, FeatureCollection, Layer, LayerPolicy};

/// Measure and conditionally simplify a feature's outer ring.
///
/// Returns a new feature with the derived metrics stamped; the source
/// properties, id and every other ring are carried over unchanged.
pub fn process_feature(feature: &Feature, policy: &LayerPolicy) -> Feature {
    let outer = feature.geometry.outer_ring();
    let original_point_count = outer.len();
    let area = bbox_area(outer);

    let (geometry, simplified_point_count) = match simplify_if_needed(outer, policy) {
        Cow::Borrowed(ring) => (feature.geometry.clone(), ring.len()),
        Cow::Owned(ring) => {
            let count = ring.len();
            let mut geometry = feature.geometry.clone();
            if let Some(outer) = geometry.outer_ring_mut() {
                *outer = ring;
            }
            (geometry, count)
        }
    };

    Feature {
        kind: feature.kind,
        id: feature.id.clone(),
        geometry,
        properties: feature.properties.clone(),
        extra: feature.extra.clone(),
        derived: Some(DerivedMetrics {
            area,
            original_point_count,
            simplified_point_count,
        }),
    }
}

/// Process a collection with the policy of `layer`.
pub fn process_collection(collection: &FeatureCollection, layer: Layer) -> FeatureCollection {
    info!("Processing {} {} features", collection.len(), layer);
    process_collection_with_policy(collection, &layer.policy())
}

pub fn process_collection_with_policy(
    collection: &FeatureCollection,
    policy: &LayerPolicy,
) -> FeatureCollection {
    let features = collection
        .features
        .iter()
        .map(|f| process_feature(f, policy))
        .collect();
    finish(collection, features)
}

/// Same output as [`process_collection_with_policy`], features spread
/// across the rayon thread pool.
pub fn process_collection_par(
    collection: &FeatureCollection,
    policy: &LayerPolicy,
) -> FeatureCollection {
    let features = collection
        .features
        .par_iter()
        .map(|f| process_feature(f, policy))
        .collect();
    finish(collection, features)
}

fn finish(source: &FeatureCollection, features: Vec<Feature>) -> FeatureCollection {
    let processed = FeatureCollection {
        kind: source.kind,
        features,
        extra: source.extra.clone(),
    };

    // The summary walks every geometry; only build it when it gets logged.
    if enabled!(Level::DEBUG) {
        let summary = LayerSummary::from_collection(&processed);
        debug!(
            "Processed {} features: {} simplified, {} -> {} points, {} small",
            summary.features,
            summary.simplified,
            summary.original_points,
            summary.simplified_points,
            summary.small
        );
    }

    processed
}

/// Aggregate view of a processed collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerSummary {
    pub features: usize,
    /// Features whose outer ring lost points
    pub simplified: usize,
    pub small: usize,
    pub original_points: usize,
    pub simplified_points: usize,
    /// Extent of all geometry, holes and extra parts included
    pub extent: Option<Bbox>,
}

impl LayerSummary {
    pub fn from_collection(collection: &FeatureCollection) -> Self {
        let mut summary = LayerSummary {
            features: collection.len(),
            ..Default::default()
        };

        for feature in &collection.features {
            if let Some(metrics) = &feature.derived {
                summary.original_points += metrics.original_point_count;
                summary.simplified_points += metrics.simplified_point_count;
                if metrics.simplified_point_count < metrics.original_point_count {
                    summary.simplified += 1;
                }
            }
            if is_small_feature(feature) {
                summary.small += 1;
            }

            if let Some(rect) = feature.geometry.to_geo().bounding_rect() {
                let bbox = Bbox {
                    min_x: rect.min().x,
                    min_y: rect.min().y,
                    max_x: rect.max().x,
                    max_y: rect.max().y,
                };
                summary.extent = Some(match summary.extent {
                    Some(extent) => extent.union(&bbox),
                    None => bbox,
                });
            }
        }

        summary
    }
}
