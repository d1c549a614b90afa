//! Accessibility project ETL and project-to-station association.

use std::collections::BTreeMap;

use geo::{Geometry, Point};
use geojson::feature::Id;
use subway_access_dataset_models::{
    ProjectAssociation, ProjectFeature, ProjectStatus, ProjectSupplement,
};
use subway_access_spatial::{Located, find_nearest_n};

use crate::LabeledStation;

/// Placemark style of completed projects in the MTA map.
const COMPLETED_STYLE: &str = "icon-1769-0288D1-nodesc";
/// Placemark style of projects under construction.
const ONGOING_STYLE: &str = "icon-1590-A52714-nodesc";

/// Sets each project's status from its placemark style.
///
/// Unrecognized styles leave the existing status untouched.
#[must_use]
pub fn tag_project_status(projects: Vec<ProjectFeature>) -> Vec<ProjectFeature> {
    projects
        .into_iter()
        .map(|mut project| {
            let style = project.properties.style_url.as_deref().unwrap_or_default();
            if style.contains(COMPLETED_STYLE) {
                project.properties.status = Some(ProjectStatus::Completed);
            } else if style.contains(ONGOING_STYLE) {
                project.properties.status = Some(ProjectStatus::Ongoing);
            }
            project
        })
        .collect()
}

/// Fills fields a placemark lacks from the supplement entry with the same
/// name.
#[must_use]
pub fn merge_project_supplement(
    projects: Vec<ProjectFeature>,
    supplement: &[ProjectSupplement],
) -> Vec<ProjectFeature> {
    let mut by_name: BTreeMap<&str, &ProjectSupplement> = BTreeMap::new();
    for entry in supplement {
        by_name.entry(entry.name.as_str()).or_insert(entry);
    }

    let mut matched = 0_usize;
    let projects = projects
        .into_iter()
        .map(|mut project| {
            let Some(entry) = project
                .properties
                .name
                .as_deref()
                .and_then(|name| by_name.get(name))
            else {
                return project;
            };
            matched += 1;
            let props = &mut project.properties;
            if props.project_type.is_none() {
                props.project_type.clone_from(&entry.project_type);
            }
            if props.details.is_none() {
                props.details.clone_from(&entry.details);
            }
            if props.status.is_none() {
                props.status.clone_from(&entry.status);
            }
            project
        })
        .collect();

    log::info!(
        "Matched {matched} projects against {} supplement entries",
        supplement.len()
    );
    projects
}

/// Gives every project without an id a random UUID.
#[must_use]
pub fn assign_project_ids(projects: Vec<ProjectFeature>) -> Vec<ProjectFeature> {
    projects
        .into_iter()
        .map(|mut project| {
            if project.id.is_none() {
                project.id = Some(Id::String(uuid::Uuid::new_v4().to_string()));
            }
            project
        })
        .collect()
}

/// Runs the project ETL: status tagging, supplement merge, id assignment.
#[must_use]
pub fn prepare_projects(
    projects: Vec<ProjectFeature>,
    supplement: &[ProjectSupplement],
) -> Vec<ProjectFeature> {
    assign_project_ids(merge_project_supplement(
        tag_project_status(projects),
        supplement,
    ))
}

fn id_string(id: &Id) -> String {
    match id {
        Id::String(s) => s.clone(),
        Id::Number(n) => n.to_string(),
    }
}

/// A station location tagged with its position in the collection.
struct StationSlot {
    index: usize,
    location: Point<f64>,
}

impl Located for StationSlot {
    fn location(&self) -> Point<f64> {
        self.location
    }
}

/// Attaches each completed or ongoing project to its nearest station
/// within `max_distance_meters`.
///
/// Projects with any other status are ignored. A project with no station
/// in range is logged and left unassociated. A station may collect any
/// number of projects; a project joins at most one station.
#[must_use]
pub fn associate_projects(
    mut stations: Vec<LabeledStation>,
    projects: &[ProjectFeature],
    max_distance_meters: f64,
) -> Vec<LabeledStation> {
    let slots: Vec<StationSlot> = stations
        .iter()
        .enumerate()
        .map(|(index, station)| StationSlot {
            index,
            location: station.location(),
        })
        .collect();

    let mut associated = 0_usize;
    for project in projects {
        let props = &project.properties;
        let Some(status) = props.status.as_ref().filter(|s| s.is_associable()) else {
            continue;
        };
        let Some(id) = project.id.as_ref().map(id_string) else {
            log::warn!(
                "Skipping project without an id: {}",
                props.name.as_deref().unwrap_or("<unnamed>")
            );
            continue;
        };

        let target = Geometry::Point(project.geometry);
        let nearest = find_nearest_n(1, &slots, &target, max_distance_meters);
        let Some(hit) = nearest.first() else {
            log::warn!(
                "No station found within {max_distance_meters} meters of project: {}",
                props.name.as_deref().unwrap_or("<unnamed>")
            );
            continue;
        };

        stations[hit.item.index].ada_projects.push(ProjectAssociation {
            id,
            name: props.name.clone(),
            status: status.clone(),
            project_type: props.project_type.clone(),
            details: props.details.clone(),
        });
        associated += 1;
    }

    log::info!(
        "Associated {associated} of {} projects with stations",
        projects.len()
    );
    stations
}
