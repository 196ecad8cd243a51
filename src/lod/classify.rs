//! Small-feature classification.
//!
//! Features below the cutoff are drawn as point markers instead of filled
//! polygons and are hidden at low zoom by the rendering layer.

use crate::models::{Feature, FeatureCollection};

/// Area cutoff in square degrees, against the bounding-box proxy
pub const SMALL_FEATURE_AREA: f64 = 0.05;

/// True iff the feature carries a derived area strictly below the cutoff.
///
/// Unprocessed features are never small.
pub fn is_small_feature(feature: &Feature) -> bool {
    feature
        .derived
        .as_ref()
        .is_some_and(|metrics| metrics.area < SMALL_FEATURE_AREA)
}

/// Small features of a processed collection, in collection order
pub fn small_features(collection: &FeatureCollection) -> impl Iterator<Item = &Feature> {
    collection.features.iter().filter(|f| is_small_feature(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundaryGeometry, BoundaryProperties, DerivedMetrics};

    fn feature_with_area(area: Option<f64>) -> Feature {
        let mut feature = Feature::new(
            None,
            BoundaryGeometry::Polygon {
                coordinates: vec![],
            },
            BoundaryProperties::default(),
        );
        feature.derived = area.map(|area| DerivedMetrics {
            area,
            original_point_count: 0,
            simplified_point_count: 0,
        });
        feature
    }

    #[test]
    fn test_cutoff_is_strict() {
        assert!(!is_small_feature(&feature_with_area(Some(0.05))));
        assert!(is_small_feature(&feature_with_area(Some(0.0499999))));
        assert!(!is_small_feature(&feature_with_area(Some(1.2))));
        assert!(is_small_feature(&feature_with_area(Some(0.0))));
    }

    #[test]
    fn test_missing_area_is_not_small() {
        assert!(!is_small_feature(&feature_with_area(None)));
    }

    #[test]
    fn test_nan_area_is_not_small() {
        assert!(!is_small_feature(&feature_with_area(Some(f64::NAN))));
    }

    #[test]
    fn test_small_features_filter() {
        let collection = FeatureCollection::new(vec![
            feature_with_area(Some(0.01)),
            feature_with_area(None),
            feature_with_area(Some(0.5)),
            feature_with_area(Some(0.02)),
        ]);
        assert_eq!(small_features(&collection).count(), 2);
    }
}
