//! Boundary features and collections.
//!
//! # Serialization Notes
//! - The derived metrics computed by the pipeline are kept out of the source
//!   property record and are skipped by the default `Serialize` impl, so
//!   writing a collection as-is always yields canonical source data.
//! - Use [`FeatureCollection::annotated`] to emit the derived metrics under
//!   their `_area`, `_originalPointCount` and `_simplifiedPointCount` keys.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{BoundaryGeometry, Layer};

/// Property keys owned by the pipeline, never part of source data.
pub const DERIVED_KEYS: [&str; 3] = ["_area", "_originalPointCount", "_simplifiedPointCount"];

const UNNAMED: &str = "Sans nom";
const DEFAULT_COUNTRY: &str = "Burkina Faso";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// GeoJSON feature identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(serde_json::Number),
    String(String),
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{}", n),
            FeatureId::String(s) => write!(f, "{}", s),
        }
    }
}

/// Source attributes of an administrative boundary.
///
/// Stored as the raw, ordered property object so values, nulls, number
/// formatting and key order survive a load/write cycle untouched. The fields
/// of the OCHA (`admin*`) and GADM (`GID_*`, `NAME_*`) exports are exposed
/// through typed accessors; a value of an unexpected type reads as `None`.
///
/// Serialization always leaves out the pipeline-owned [`DERIVED_KEYS`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct BoundaryProperties(Map<String, Value>);

macro_rules! str_accessors {
    ($($name:ident => $key:literal),* $(,)?) => {
        $(
            #[doc = concat!("`", $key, "` as a string")]
            pub fn $name(&self) -> Option<&str> {
                self.get_str($key)
            }
        )*
    };
}

impl BoundaryProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Integer value, accepting integral floats such as `3.0`
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        let value = self.0.get(key)?;
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Source entries in order, pipeline-owned keys excluded
    pub fn source_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(key, _)| !is_derived_key(key))
    }

    pub fn object_id(&self) -> Option<i64> {
        self.get_i64("OBJECTID")
    }

    pub fn fid(&self) -> Option<i64> {
        self.get_i64("FID")
    }

    pub fn shape_length(&self) -> Option<f64> {
        self.get_f64("Shape_Leng")
    }

    pub fn shape_area(&self) -> Option<f64> {
        self.get_f64("Shape_Area")
    }

    str_accessors! {
        admin0_name => "admin0Name",
        admin1_name => "admin1Name",
        admin0_pcode => "admin0Pcod",
        admin1_pcode => "admin1Pcod",
        date => "date",
        valid_on => "validOn",
        valid_to => "validTo",
        gid_0 => "GID_0",
        gid_1 => "GID_1",
        gid_2 => "GID_2",
        gid_3 => "GID_3",
        country => "COUNTRY",
        name_1 => "NAME_1",
        name_2 => "NAME_2",
        name_3 => "NAME_3",
        nl_name_1 => "NL_NAME_1",
        nl_name_2 => "NL_NAME_2",
        nl_name_3 => "NL_NAME_3",
        type_3 => "TYPE_3",
        engtype_3 => "ENGTYPE_3",
        hasc_3 => "HASC_3",
    }

    /// Remove pipeline-owned keys that leaked into the source map
    pub fn strip_derived(&mut self) -> usize {
        DERIVED_KEYS
            .iter()
            .filter_map(|key| self.0.shift_remove(*key))
            .count()
    }
}

impl From<Map<String, Value>> for BoundaryProperties {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for BoundaryProperties {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for BoundaryProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.source_entries())
    }
}

fn is_derived_key(key: &str) -> bool {
    DERIVED_KEYS.contains(&key)
}

/// Metrics stamped on a feature by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Bounding-box area of the outer ring, in square degrees
    #[serde(rename = "_area")]
    pub area: f64,
    #[serde(rename = "_originalPointCount")]
    pub original_point_count: usize,
    #[serde(rename = "_simplifiedPointCount")]
    pub simplified_point_count: usize,
}

/// A single administrative boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureTag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,

    pub geometry: BoundaryGeometry,

    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: BoundaryProperties,

    /// Foreign members (`bbox`, ...), passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Pipeline metadata; `None` until the feature has been processed
    #[serde(skip)]
    pub derived: Option<DerivedMetrics>,
}

impl Feature {
    pub fn new(
        id: Option<FeatureId>,
        geometry: BoundaryGeometry,
        properties: BoundaryProperties,
    ) -> Self {
        Self {
            kind: FeatureTag::Feature,
            id,
            geometry,
            properties,
            extra: Map::new(),
            derived: None,
        }
    }

    /// Display name for the given layer
    pub fn display_name(&self, layer: Layer) -> &str {
        let p = &self.properties;
        let candidates = match layer {
            Layer::Regions => [p.admin1_name(), p.name_1()],
            Layer::Provinces => [p.name_2(), p.admin1_name()],
            Layer::Communes => [p.name_3(), p.admin1_name()],
        };
        first_non_empty(candidates).unwrap_or(UNNAMED)
    }

    /// Administrative code (p-code or GADM id) for the given layer
    pub fn code(&self, layer: Layer) -> &str {
        let p = &self.properties;
        let candidates = match layer {
            Layer::Regions => [p.admin1_pcode(), p.gid_1()],
            Layer::Provinces => [p.gid_2(), p.admin1_pcode()],
            Layer::Communes => [p.gid_3(), p.admin1_pcode()],
        };
        first_non_empty(candidates).unwrap_or("")
    }

    /// Name of the enclosing administrative unit
    pub fn parent_name(&self, layer: Layer) -> &str {
        let p = &self.properties;
        match layer {
            Layer::Regions => {
                first_non_empty([p.admin0_name(), p.country()]).unwrap_or(DEFAULT_COUNTRY)
            }
            Layer::Provinces => first_non_empty([p.name_1(), p.admin1_name()]).unwrap_or(""),
            Layer::Communes => first_non_empty([p.name_2()]).unwrap_or(""),
        }
    }

    /// Borrowed view that serializes the derived metrics into `properties`
    pub fn annotated(&self) -> AnnotatedFeature<'_> {
        AnnotatedFeature {
            kind: self.kind,
            id: self.id.as_ref(),
            geometry: &self.geometry,
            properties: AnnotatedProperties {
                source: &self.properties,
                derived: self.derived.as_ref(),
            },
            extra: &self.extra,
        }
    }
}

// Empty strings fall through like missing ones.
fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

fn null_as_default<'de, D>(deserializer: D) -> Result<BoundaryProperties, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BoundaryProperties>::deserialize(deserializer)?.unwrap_or_default())
}

/// A GeoJSON feature collection of boundaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionTag,

    pub features: Vec<Feature>,

    /// Foreign members (`name`, `crs`, ...), passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionTag::FeatureCollection,
            features,
            extra: Map::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Borrowed view including derived metrics
    pub fn annotated(&self) -> AnnotatedCollection<'_> {
        AnnotatedCollection {
            kind: self.kind,
            features: self.features.iter().map(Feature::annotated).collect(),
            extra: &self.extra,
        }
    }

    /// Serialize as canonical source data (no derived keys)
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Drop derived metrics and any derived keys in the property maps
    pub fn strip_derived(&mut self) -> usize {
        self.features
            .iter_mut()
            .map(|f| {
                f.derived = None;
                f.properties.strip_derived()
            })
            .sum()
    }
}

/// Source properties followed by the derived metrics.
#[derive(Debug)]
pub struct AnnotatedProperties<'a> {
    source: &'a BoundaryProperties,
    derived: Option<&'a DerivedMetrics>,
}

impl Serialize for AnnotatedProperties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.source.source_entries() {
            map.serialize_entry(key, value)?;
        }
        if let Some(metrics) = self.derived {
            map.serialize_entry(DERIVED_KEYS[0], &metrics.area)?;
            map.serialize_entry(DERIVED_KEYS[1], &metrics.original_point_count)?;
            map.serialize_entry(DERIVED_KEYS[2], &metrics.simplified_point_count)?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct AnnotatedFeature<'a> {
    #[serde(rename = "type")]
    kind: FeatureTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a FeatureId>,
    geometry: &'a BoundaryGeometry,
    properties: AnnotatedProperties<'a>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct AnnotatedCollection<'a> {
    #[serde(rename = "type")]
    kind: CollectionTag,
    features: Vec<AnnotatedFeature<'a>>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use serde_json::json;

    fn triangle() -> BoundaryGeometry {
        BoundaryGeometry::Polygon {
            coordinates: vec![vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 0.0 },
                Coord { x: 0.0, y: 1.0 },
                Coord { x: 0.0, y: 0.0 },
            ]],
        }
    }

    fn props(value: Value) -> BoundaryProperties {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_properties_pass_through() {
        let json = json!({
            "type": "Feature",
            "id": 7,
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 1], [0, 0]]]},
            "properties": {"NAME_3": "Koudougou", "population": 160239, "tags": ["a", "b"]}
        });
        let feature: Feature = serde_json::from_value(json).unwrap();
        assert_eq!(feature.properties.name_3(), Some("Koudougou"));
        assert_eq!(feature.properties.get("population"), Some(&json!(160239)));

        let back = serde_json::to_value(&feature).unwrap();
        assert_eq!(back["properties"]["tags"], json!(["a", "b"]));
        assert_eq!(back["id"], json!(7));
    }

    #[test]
    fn test_properties_written_back_verbatim() {
        let source = r#"{"validTo":null,"Shape_Area":1,"admin1Name":"Centre","NAME_3":null,"OBJECTID":3.0,"NAME_1":42}"#;
        let properties: BoundaryProperties = serde_json::from_str(source).unwrap();
        assert_eq!(serde_json::to_string(&properties).unwrap(), source);

        // Mistyped known fields read as absent instead of failing the load
        assert_eq!(properties.name_1(), None);
        assert_eq!(properties.name_3(), None);
        assert_eq!(properties.valid_to(), None);
        assert_eq!(properties.object_id(), Some(3));
        assert_eq!(properties.shape_area(), Some(1.0));
        assert_eq!(properties.admin1_name(), Some("Centre"));
    }

    #[test]
    fn test_default_serialization_is_canonical() {
        let mut feature = Feature::new(None, triangle(), BoundaryProperties::default());
        feature.derived = Some(DerivedMetrics {
            area: 1.0,
            original_point_count: 4,
            simplified_point_count: 4,
        });
        let value = serde_json::to_value(&feature).unwrap();
        for key in DERIVED_KEYS {
            assert!(value["properties"].get(key).is_none());
        }

        let annotated = serde_json::to_value(feature.annotated()).unwrap();
        assert_eq!(annotated["properties"]["_area"], json!(1.0));
        assert_eq!(annotated["properties"]["_originalPointCount"], json!(4));
        assert_eq!(annotated["properties"]["_simplifiedPointCount"], json!(4));
    }

    #[test]
    fn test_leaked_derived_keys_written_once() {
        let mut feature = Feature::new(
            None,
            triangle(),
            props(json!({"source": "ocha", "_area": 0.2})),
        );
        let collection = FeatureCollection::new(vec![feature.clone()]);
        let canonical: Value =
            serde_json::from_str(&collection.to_canonical_json().unwrap()).unwrap();
        let p = &canonical["features"][0]["properties"];
        assert!(p.get("_area").is_none());
        assert_eq!(p["source"], json!("ocha"));

        feature.derived = Some(DerivedMetrics {
            area: 0.5,
            original_point_count: 4,
            simplified_point_count: 4,
        });
        let annotated = serde_json::to_string(&feature.annotated()).unwrap();
        assert_eq!(annotated.matches("\"_area\"").count(), 1);
        assert!(annotated.contains("\"_area\":0.5"));
    }

    #[test]
    fn test_feature_foreign_members_preserved() {
        let source = json!({
            "type": "Feature",
            "id": 1,
            "bbox": [0.0, 0.0, 1.0, 1.0],
            "geometry": {"type": "Polygon", "coordinates": []},
            "properties": {}
        });
        let feature: Feature = serde_json::from_value(source).unwrap();
        assert_eq!(feature.extra["bbox"], json!([0.0, 0.0, 1.0, 1.0]));
        assert_eq!(
            serde_json::to_value(&feature).unwrap()["bbox"],
            json!([0.0, 0.0, 1.0, 1.0])
        );
        assert_eq!(
            serde_json::to_value(feature.annotated()).unwrap()["bbox"],
            json!([0.0, 0.0, 1.0, 1.0])
        );
    }

    #[test]
    fn test_collection_foreign_members_preserved() {
        let json = json!({
            "type": "FeatureCollection",
            "name": "bfa_admin3",
            "features": []
        });
        let collection: FeatureCollection = serde_json::from_value(json).unwrap();
        assert_eq!(collection.extra["name"], json!("bfa_admin3"));
        let annotated = serde_json::to_value(collection.annotated()).unwrap();
        assert_eq!(annotated["name"], json!("bfa_admin3"));
        assert_eq!(annotated["type"], json!("FeatureCollection"));
    }

    #[test]
    fn test_wrong_collection_type_rejected() {
        let json = json!({"type": "Feature", "features": []});
        assert!(serde_json::from_value::<FeatureCollection>(json).is_err());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let feature = Feature::new(None, triangle(), props(json!({"admin1Name": "Centre"})));
        assert_eq!(feature.display_name(Layer::Regions), "Centre");
        assert_eq!(feature.display_name(Layer::Communes), "Centre");

        let feature = Feature::new(None, triangle(), props(json!({"admin1Name": null})));
        assert_eq!(feature.display_name(Layer::Provinces), "Sans nom");

        let feature = Feature::new(None, triangle(), props(json!({"NAME_3": "Ouagadougou"})));
        assert_eq!(feature.display_name(Layer::Communes), "Ouagadougou");
    }

    #[test]
    fn test_code_and_parent() {
        let properties = props(json!({
            "admin1Pcod": "BF13",
            "GID_3": "BFA.1.1.1_1",
            "NAME_1": "Boucle du Mouhoun",
            "NAME_2": "Balé"
        }));
        let feature = Feature::new(None, triangle(), properties);
        assert_eq!(feature.code(Layer::Regions), "BF13");
        assert_eq!(feature.code(Layer::Provinces), "BF13");
        assert_eq!(feature.code(Layer::Communes), "BFA.1.1.1_1");
        assert_eq!(feature.parent_name(Layer::Regions), "Burkina Faso");
        assert_eq!(feature.parent_name(Layer::Provinces), "Boucle du Mouhoun");
        assert_eq!(feature.parent_name(Layer::Communes), "Balé");
    }

    #[test]
    fn test_empty_name_falls_through() {
        let properties = props(json!({"admin1Name": "", "NAME_1": "Sahel"}));
        let feature = Feature::new(None, triangle(), properties);
        assert_eq!(feature.display_name(Layer::Regions), "Sahel");
    }

    #[test]
    fn test_null_properties_default() {
        let json = json!({
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": []},
            "properties": null
        });
        let feature: Feature = serde_json::from_value(json).unwrap();
        assert_eq!(feature.properties, BoundaryProperties::default());
    }

    #[test]
    fn test_string_feature_id() {
        let json = json!({
            "type": "Feature",
            "id": "BFA.1_1",
            "geometry": {"type": "Polygon", "coordinates": []},
            "properties": {}
        });
        let feature: Feature = serde_json::from_value(json).unwrap();
        assert_eq!(feature.id.unwrap().to_string(), "BFA.1_1");
    }
}
