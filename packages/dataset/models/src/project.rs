//! ADA accessibility project records.

use serde::{Deserialize, Serialize};
use subway_access_spatial::PointFeature;

use crate::ExtraProperties;

/// Lifecycle status of an accessibility project.
///
/// Statuses outside the known set are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum ProjectStatus {
    /// Construction finished.
    Completed,
    /// Under construction.
    Ongoing,
    /// Announced but not started.
    Planned,
    /// Any other upstream value.
    #[serde(untagged)]
    #[strum(to_string = "{0}")]
    Other(String),
}

impl ProjectStatus {
    /// Whether projects with this status are associated with stations.
    #[must_use]
    pub const fn is_associable(&self) -> bool {
        matches!(self, Self::Completed | Self::Ongoing)
    }
}

/// Properties of a project placemark from the `mta-ada-projects` dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectProperties {
    /// Project name (usually the station name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project status, tagged from the placemark style when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    /// Project type (e.g. "Elevator", "Full ADA").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    /// Free-form details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// KML style reference carried over by the converter.
    #[serde(rename = "styleUrl", default, skip_serializing_if = "Option::is_none")]
    pub style_url: Option<String>,
    /// Remaining placemark properties.
    #[serde(flatten)]
    pub extra: ExtraProperties,
}

/// A project point feature.
pub type ProjectFeature = PointFeature<ProjectProperties>;

/// Hand-curated supplemental information for a project, matched by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSupplement {
    /// Project name to match.
    pub name: String,
    /// Project type override.
    #[serde(rename = "type", default)]
    pub project_type: Option<String>,
    /// Details text.
    #[serde(default)]
    pub details: Option<String>,
    /// Status, when the placemark style does not carry one.
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

/// A project attached to its nearest station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssociation {
    /// Project id.
    pub id: String,
    /// Project name.
    pub name: Option<String>,
    /// Project status (`Completed` or `Ongoing`).
    pub status: ProjectStatus,
    /// Project type.
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    /// Details text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
