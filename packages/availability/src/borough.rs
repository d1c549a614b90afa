//! Borough boundary enrichment and borough centre points.

use std::collections::BTreeMap;

use geojson::feature::Id;
use subway_access_dataset_models::{BoroughCenterProperties, BoroughFeature};
use subway_access_spatial::{Feature, PointFeature, centroid};

/// Availability written for boroughs with no data in the window.
pub const MISSING_AVAILABILITY: f64 = -1.0;

/// Numbers boroughs by position and attaches platform availability.
///
/// Boroughs missing from `availability` get [`MISSING_AVAILABILITY`].
#[must_use]
pub fn enrich_boroughs(
    boroughs: Vec<BoroughFeature>,
    availability: &BTreeMap<String, f64>,
) -> Vec<BoroughFeature> {
    boroughs
        .into_iter()
        .enumerate()
        .map(|(index, mut borough)| {
            borough.id = Some(Id::Number(index.into()));
            let value = availability
                .get(&borough.properties.boroname)
                .copied()
                .unwrap_or_else(|| {
                    log::warn!(
                        "No platform availability data found for borough: {}",
                        borough.properties.boroname
                    );
                    MISSING_AVAILABILITY
                });
            borough.properties.platform_availability = Some(value);
            borough
        })
        .collect()
}

/// One point per borough at its polygon centroid, labeled with the
/// borough name and platform availability.
#[must_use]
pub fn borough_centers(boroughs: &[BoroughFeature]) -> Vec<PointFeature<BoroughCenterProperties>> {
    boroughs
        .iter()
        .filter_map(|borough| {
            let Some(center) = centroid(&borough.geometry) else {
                log::warn!("Borough {} has an empty geometry", borough.properties.boroname);
                return None;
            };
            Some(Feature::new(
                center,
                BoroughCenterProperties {
                    name: borough.properties.boroname.clone(),
                    platform_availability: borough
                        .properties
                        .platform_availability
                        .unwrap_or(MISSING_AVAILABILITY),
                },
            ))
        })
        .collect()
}
