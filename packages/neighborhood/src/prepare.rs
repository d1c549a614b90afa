//! Census join and geometry normalization.

use std::collections::BTreeMap;

use geo::{Geometry, MultiPolygon};
use subway_access_dataset_models::{CensusRecord, NeighborhoodFeature, NeighborhoodProperties};
use subway_access_spatial::winding::enforce_multi_polygon;
use subway_access_spatial::{Feature, SpatialError, geometry_type_name};

use crate::NeighborhoodError;

/// A neighborhood with census columns merged in and a normalized
/// `MultiPolygon` boundary.
pub type NormalizedNeighborhood = Feature<MultiPolygon<f64>, NeighborhoodProperties>;

/// Merges each neighborhood's census row (matched on `GeoType` `NTA2020`
/// and `GeoID` equal to the NTA code) into its properties.
///
/// Census columns overwrite boundary properties of the same name.
/// Neighborhoods without a census row are logged and left as they are.
#[must_use]
pub fn merge_census(
    neighborhoods: Vec<NeighborhoodFeature>,
    census: &[CensusRecord],
) -> Vec<NeighborhoodFeature> {
    let mut by_nta: BTreeMap<&str, &CensusRecord> = BTreeMap::new();
    for record in census {
        if let Some(nta_code) = record.nta_code() {
            by_nta.entry(nta_code).or_insert(record);
        }
    }

    neighborhoods
        .into_iter()
        .map(|mut neighborhood| {
            let props = &mut neighborhood.properties;
            let Some(record) = by_nta.get(props.nta2020.as_str()) else {
                log::info!("No census data found for neighborhood: {}", props.nta2020);
                return neighborhood;
            };
            props
                .extra
                .insert("GeoType".to_string(), record.geo_type.clone().into());
            if let Some(geo_id) = &record.geo_id {
                props.extra.insert("GeoID".to_string(), geo_id.clone().into());
            }
            for (column, value) in &record.fields {
                props.extra.insert(column.clone(), value.clone());
            }
            neighborhood
        })
        .collect()
}

/// Converts a `Polygon` or `MultiPolygon` into a right-hand-rule
/// `MultiPolygon`. A `Polygon` becomes the single member of the result.
///
/// # Errors
///
/// Returns [`SpatialError::UnsupportedGeometry`] for any other geometry.
pub fn normalize_geometry(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>, SpatialError> {
    let multi = match geometry {
        Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
        Geometry::MultiPolygon(multi) => multi,
        other => {
            return Err(SpatialError::UnsupportedGeometry {
                operation: "neighborhood normalization",
                geometry_type: geometry_type_name(&other),
            });
        }
    };
    Ok(enforce_multi_polygon(multi))
}

/// Joins census data and normalizes every neighborhood geometry.
///
/// # Errors
///
/// Returns [`NeighborhoodError::Geometry`] if a neighborhood is not
/// polygonal.
pub fn prepare_neighborhoods(
    neighborhoods: Vec<NeighborhoodFeature>,
    census: &[CensusRecord],
) -> Result<Vec<NormalizedNeighborhood>, NeighborhoodError> {
    merge_census(neighborhoods, census)
        .into_iter()
        .map(|neighborhood| {
            let geometry = normalize_geometry(neighborhood.geometry).map_err(|source| {
                NeighborhoodError::Geometry {
                    nta: neighborhood.properties.nta2020.clone(),
                    source,
                }
            })?;
            Ok(Feature {
                id: neighborhood.id,
                geometry,
                properties: neighborhood.properties,
            })
        })
        .collect()
}
