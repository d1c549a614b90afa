//! Typed `GeoJSON` features.
//!
//! [`Feature`] pairs a `geo` geometry with a typed property record. Each
//! dataset declares its own property struct (known fields typed, unknown
//! fields preserved through a flattened map), so pipeline stages never
//! poke at untyped JSON objects.

use geo::{Geometry, Point};
use geojson::feature::Id;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::SpatialError;

/// A geometry with an optional feature id and typed properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature<G, P> {
    /// `GeoJSON` feature id, if any.
    pub id: Option<Id>,
    /// The feature geometry.
    pub geometry: G,
    /// Typed properties.
    pub properties: P,
}

/// A point feature (stations, projects, borough centres).
pub type PointFeature<P> = Feature<Point<f64>, P>;

/// A polygonal feature (boroughs, neighborhoods). The geometry is kept as
/// a general [`Geometry`] since sources mix `Polygon` and `MultiPolygon`.
pub type PolygonFeature<P> = Feature<Geometry<f64>, P>;

impl<G, P> Feature<G, P> {
    /// Creates a feature without an id.
    pub const fn new(geometry: G, properties: P) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    /// Replaces the properties, keeping id and geometry.
    pub fn with_properties<Q>(self, properties: Q) -> Feature<G, Q> {
        Feature {
            id: self.id,
            geometry: self.geometry,
            properties,
        }
    }
}

impl<G, P> Feature<G, P>
where
    G: TryFrom<Geometry<f64>>,
    G::Error: std::fmt::Display,
    P: DeserializeOwned,
{
    /// Converts a raw `GeoJSON` feature into its typed form.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the feature has no geometry, the geometry
    /// is of the wrong kind, or the properties do not match `P`.
    pub fn from_geojson(feature: geojson::Feature) -> Result<Self, SpatialError> {
        let geometry = feature.geometry.ok_or_else(|| SpatialError::Conversion {
            message: format!("feature {:?} has no geometry", feature.id),
        })?;
        let geometry: Geometry<f64> = geometry.try_into()?;
        let geometry = G::try_from(geometry).map_err(|e| SpatialError::Conversion {
            message: format!("feature {:?}: {e}", feature.id),
        })?;

        let properties = serde_json::Value::Object(feature.properties.unwrap_or_default());
        let properties = serde_json::from_value(properties)?;

        Ok(Self {
            id: feature.id,
            geometry,
            properties,
        })
    }
}

impl<G, P> Feature<G, P>
where
    G: Clone + Into<Geometry<f64>>,
    P: Serialize,
{
    /// Converts this feature back into a raw `GeoJSON` feature.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the properties do not serialize to a
    /// JSON object.
    pub fn to_geojson(&self) -> Result<geojson::Feature, SpatialError> {
        let geometry: Geometry<f64> = self.geometry.clone().into();

        let properties = match serde_json::to_value(&self.properties)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(SpatialError::Conversion {
                    message: format!("properties must serialize to an object, got {other}"),
                });
            }
        };

        Ok(geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&geometry))),
            id: self.id.clone(),
            properties: Some(properties),
            foreign_members: None,
        })
    }
}

/// Converts every feature of a collection into its typed form.
///
/// # Errors
///
/// Fails on the first feature that does not convert, naming its position.
pub fn features_from_collection<G, P>(
    collection: geojson::FeatureCollection,
) -> Result<Vec<Feature<G, P>>, SpatialError>
where
    G: TryFrom<Geometry<f64>>,
    G::Error: std::fmt::Display,
    P: DeserializeOwned,
{
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            Feature::from_geojson(feature).map_err(|e| SpatialError::Conversion {
                message: format!("feature #{i}: {e}"),
            })
        })
        .collect()
}

/// Builds a `GeoJSON` feature collection from typed features.
///
/// # Errors
///
/// Returns [`SpatialError`] if any feature's properties fail to serialize.
pub fn to_feature_collection<G, P>(
    features: &[Feature<G, P>],
) -> Result<geojson::FeatureCollection, SpatialError>
where
    G: Clone + Into<Geometry<f64>>,
    P: Serialize,
{
    Ok(geojson::FeatureCollection {
        bbox: None,
        features: features
            .iter()
            .map(Feature::to_geojson)
            .collect::<Result<_, _>>()?,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Props {
        name: String,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    }

    fn raw_point_feature() -> geojson::Feature {
        let json = r#"{
            "type": "Feature",
            "id": 7,
            "geometry": { "type": "Point", "coordinates": [-73.98, 40.75] },
            "properties": { "name": "Times Sq", "routes": "1 2 3" }
        }"#;
        json.parse::<geojson::GeoJson>()
            .unwrap()
            .try_into()
            .unwrap()
    }

    #[test]
    fn converts_point_feature_with_typed_properties() {
        let feature: PointFeature<Props> = Feature::from_geojson(raw_point_feature()).unwrap();
        assert_eq!(feature.geometry, Point::new(-73.98, 40.75));
        assert_eq!(feature.properties.name, "Times Sq");
        assert_eq!(feature.properties.extra["routes"], "1 2 3");
        assert_eq!(feature.id, Some(Id::Number(7.into())));
    }

    #[test]
    fn rejects_wrong_geometry_kind() {
        let mut raw = raw_point_feature();
        raw.geometry = Some(geojson::Geometry::new(geojson::Value::LineString(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        ])));
        assert!(PointFeature::<Props>::from_geojson(raw).is_err());
    }

    #[test]
    fn rejects_missing_geometry() {
        let mut raw = raw_point_feature();
        raw.geometry = None;
        assert!(PointFeature::<Props>::from_geojson(raw).is_err());
    }

    #[test]
    fn passthrough_fields_survive_conversion_back() {
        let feature: PointFeature<Props> = Feature::from_geojson(raw_point_feature()).unwrap();
        let back = feature.to_geojson().unwrap();
        let props = back.properties.unwrap();
        assert_eq!(props["name"], "Times Sq");
        assert_eq!(props["routes"], "1 2 3");
        assert_eq!(back.id, Some(Id::Number(7.into())));
    }

    #[test]
    fn reports_position_of_bad_feature_in_collection() {
        let mut bad = raw_point_feature();
        bad.geometry = None;
        let collection = geojson::FeatureCollection {
            bbox: None,
            features: vec![raw_point_feature(), bad],
            foreign_members: None,
        };
        let err = features_from_collection::<Point<f64>, Props>(collection).unwrap_err();
        assert!(err.to_string().contains("feature #1"), "got: {err}");
    }
}
