#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Builds the subway accessibility map's GIS artifacts.
//!
//! The pipeline is split into [`ArtifactGroup`]s, each reading a handful
//! of datasets and writing one or more JSON artifacts:
//!
//! | Group | Artifacts |
//! |---|---|
//! | `pass-through` | `subway-entrances-exits` (copied unchanged) |
//! | `boroughs` | `borough-centers-geojson`, `borough-boundaries-geojson` |
//! | `stations` | `mta-ada-projects`, `mta-subway-stations-geojson` |
//! | `neighborhoods` | `nyc-neighborhoods` |
//! | `lines` | `subway-lines-geojson` |
//! | `equipment` | `mta-elevators-and-escalators` |
//!
//! A failing group is logged and recorded in the [`RunSummary`]; the
//! remaining groups still run. A group whose dataset is in the skip list
//! is not run at all.

pub mod config;
pub mod interactive;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use strum::IntoEnumIterator as _;
use subway_access_availability::{
    AvailabilityError, aggregate_equipment, borough_centers, enrich_boroughs,
    platform_availability_by_borough, summarize_equipment,
};
use subway_access_dataset::{
    ArtifactSink, DatasetError, DatasetId, DatasetStore, OutputDir, ProgressCallback, paths,
    write_json,
};
use subway_access_dataset_models::ProjectFeature;
use subway_access_lines::build_lines;
use subway_access_neighborhood::{
    NeighborhoodError, prepare_neighborhoods, score_neighborhoods, scored_to_collection,
};
use subway_access_spatial::{SpatialError, to_feature_collection};
use subway_access_stations::{
    LabeledStation, StationError, associate_projects, dedupe_stations, label_stations,
    merge_ridership, prepare_projects, stations_to_collection,
};

pub use config::PipelineConfig;

/// Environment variable holding comma-separated dataset ids to skip.
pub const SKIP_DATASETS_ENV: &str = "SKIP_DATASETS";

/// Artifact name of the borough centre points.
pub const BOROUGH_CENTERS_ARTIFACT: &str = "borough-centers-geojson";

/// Errors that can occur while generating artifacts.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Dataset load or artifact write error.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Station enrichment error.
    #[error(transparent)]
    Station(#[from] StationError),

    /// Availability aggregation error.
    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    /// Neighborhood preparation error.
    #[error(transparent)]
    Neighborhood(#[from] NeighborhoodError),

    /// Feature conversion error.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The pipeline config could not be parsed.
    #[error("Invalid pipeline config: {0}")]
    Config(String),
}

/// An independently generated set of artifacts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ArtifactGroup {
    /// Datasets copied to the output unchanged.
    PassThrough,
    /// Borough boundaries and centres with platform availability.
    Boroughs,
    /// Accessibility projects and enriched stations.
    Stations,
    /// Scored neighborhoods. Uses the stations built by [`Self::Stations`].
    Neighborhoods,
    /// Coloured subway lines.
    Lines,
    /// Elevator and escalator inventory with availability stats.
    Equipment,
}

impl ArtifactGroup {
    /// Every group, in run order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Datasets the group cannot run without. Skipping any of them skips
    /// the group.
    #[must_use]
    pub const fn datasets(self) -> &'static [DatasetId] {
        match self {
            Self::PassThrough => &[DatasetId::EntrancesExits],
            Self::Boroughs => &[DatasetId::BoroughBoundaries, DatasetId::PlatformAvailability],
            Self::Stations => &[
                DatasetId::Stations,
                DatasetId::AdaProjects,
                DatasetId::AdaProjectsSupplement,
            ],
            Self::Neighborhoods => &[DatasetId::Neighborhoods, DatasetId::Census2020],
            Self::Lines => &[DatasetId::SubwayLines, DatasetId::SirLinePoints],
            Self::Equipment => &[
                DatasetId::ElevatorsAndEscalators,
                DatasetId::EquipmentAvailability,
            ],
        }
    }
}

/// What a user asks to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every group.
    All,
    /// Projects and stations.
    Stations,
    /// Stations, then neighborhoods.
    Neighborhoods,
    /// Borough boundaries and centres.
    Boroughs,
    /// Subway lines.
    Lines,
    /// Elevators and escalators.
    Equipment,
}

impl Target {
    /// Every target, in menu order.
    pub const ALL: &[Self] = &[
        Self::All,
        Self::Stations,
        Self::Neighborhoods,
        Self::Boroughs,
        Self::Lines,
        Self::Equipment,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "Generate all artifacts",
            Self::Stations => "Stations & accessibility projects",
            Self::Neighborhoods => "Neighborhood scores (rebuilds stations)",
            Self::Boroughs => "Borough platform availability",
            Self::Lines => "Subway lines",
            Self::Equipment => "Elevator & escalator availability",
        }
    }

    /// Groups to run, in order.
    #[must_use]
    pub fn groups(self) -> Vec<ArtifactGroup> {
        match self {
            Self::All => ArtifactGroup::all(),
            Self::Stations => vec![ArtifactGroup::Stations],
            Self::Neighborhoods => vec![ArtifactGroup::Stations, ArtifactGroup::Neighborhoods],
            Self::Boroughs => vec![ArtifactGroup::Boroughs],
            Self::Lines => vec![ArtifactGroup::Lines],
            Self::Equipment => vec![ArtifactGroup::Equipment],
        }
    }
}

/// Locations and overrides for a run. `None` falls back to the bundled
/// config and the default directories.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Pipeline config TOML.
    pub config: Option<PathBuf>,
    /// Datasets directory.
    pub datasets_dir: Option<PathBuf>,
    /// Output directory.
    pub output_dir: Option<PathBuf>,
    /// Datasets to skip.
    pub skip: Vec<DatasetId>,
}

impl RunOptions {
    /// Generates `target` into the output directory and logs the summary.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the config cannot be loaded or the
    /// output directory cannot be created. Group failures are reported in
    /// the returned [`RunSummary`] instead.
    pub async fn execute(
        &self,
        target: Target,
        progress: Arc<dyn ProgressCallback>,
    ) -> Result<RunSummary, GenerateError> {
        let config = PipelineConfig::load(self.config.as_deref())?;
        let datasets_dir = self.datasets_dir.clone().unwrap_or_else(paths::datasets_dir);
        let sink = OutputDir::create(self.output_dir.clone().unwrap_or_else(paths::output_dir))?;
        log::info!(
            "Reading datasets from {}, writing artifacts to {}",
            datasets_dir.display(),
            sink.dir().display()
        );

        let start = Instant::now();
        let summary = Pipeline::new(DatasetStore::new(datasets_dir), &sink, config)
            .with_skip(self.skip.iter().copied())
            .run(&target.groups(), progress)
            .await;

        log::info!(
            "Generation finished in {:.1}s",
            start.elapsed().as_secs_f64()
        );
        summary.log();
        Ok(summary)
    }
}

/// Why a group was not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SkipReason {
    /// A dataset the group reads is in the skip list.
    #[strum(to_string = "{0} is in the skip list")]
    Dataset(DatasetId),
    /// An upstream group in the same run failed or was skipped.
    #[strum(to_string = "the {0} group did not complete")]
    Prerequisite(ArtifactGroup),
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Groups whose artifacts were written.
    pub completed: Vec<ArtifactGroup>,
    /// Groups not run, with the reason.
    pub skipped: Vec<(ArtifactGroup, SkipReason)>,
    /// Groups that failed, with the error message.
    pub failed: Vec<(ArtifactGroup, String)>,
}

impl RunSummary {
    /// Whether no group failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Logs the outcome of every group.
    pub fn log(&self) {
        for group in &self.completed {
            log::info!("  {group}: done");
        }
        for (group, reason) in &self.skipped {
            log::info!("  {group}: skipped ({reason})");
        }
        for (group, message) in &self.failed {
            log::error!("  {group}: FAILED: {message}");
        }
    }
}

/// Sequences the artifact groups over one datasets directory.
pub struct Pipeline<'a> {
    store: DatasetStore,
    sink: &'a dyn ArtifactSink,
    config: PipelineConfig,
    skip: BTreeSet<DatasetId>,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline reading from `store` and writing to `sink`.
    #[must_use]
    pub fn new(store: DatasetStore, sink: &'a dyn ArtifactSink, config: PipelineConfig) -> Self {
        Self {
            store,
            sink,
            config,
            skip: BTreeSet::new(),
        }
    }

    /// Adds datasets to the skip list.
    #[must_use]
    pub fn with_skip(mut self, skip: impl IntoIterator<Item = DatasetId>) -> Self {
        self.skip.extend(skip);
        self
    }

    /// The first skipped dataset `group` depends on, if any.
    #[must_use]
    pub fn skipped_dataset(&self, group: ArtifactGroup) -> Option<DatasetId> {
        group
            .datasets()
            .iter()
            .copied()
            .find(|id| self.skip.contains(id))
    }

    /// Runs `groups` in order, isolating failures per group.
    pub async fn run(
        &self,
        groups: &[ArtifactGroup],
        progress: Arc<dyn ProgressCallback>,
    ) -> RunSummary {
        if !self.skip.is_empty() {
            let names: Vec<&str> = self.skip.iter().map(AsRef::as_ref).collect();
            log::info!("Will skip datasets: {}", names.join(", "));
        }

        let mut summary = RunSummary::default();
        let mut stations: Option<Vec<LabeledStation>> = None;

        progress.set_total(groups.len() as u64);
        for &group in groups {
            progress.set_message(format!("Generating {group}"));

            let reason = match self.skipped_dataset(group) {
                Some(dataset) => Some(SkipReason::Dataset(dataset)),
                None if group == ArtifactGroup::Neighborhoods
                    && stations.is_none()
                    && groups.contains(&ArtifactGroup::Stations) =>
                {
                    Some(SkipReason::Prerequisite(ArtifactGroup::Stations))
                }
                None => None,
            };
            if let Some(reason) = reason {
                log::warn!("Skipping {group}: {reason}");
                summary.skipped.push((group, reason));
                progress.inc(1);
                continue;
            }

            log::info!("Generating {group}...");
            let result = match group {
                ArtifactGroup::PassThrough => self.pass_through().await,
                ArtifactGroup::Boroughs => self.boroughs().await,
                ArtifactGroup::Stations => self.stations().await.map(|built| {
                    stations = Some(built);
                }),
                ArtifactGroup::Neighborhoods => match &stations {
                    Some(built) => self.neighborhoods(built).await,
                    None => match self.build_stations().await {
                        Ok(built) => self.neighborhoods(&built).await,
                        Err(e) => Err(e),
                    },
                },
                ArtifactGroup::Lines => self.lines().await,
                ArtifactGroup::Equipment => self.equipment().await,
            };

            match result {
                Ok(()) => summary.completed.push(group),
                Err(e) => {
                    log::error!("Failed to generate {group}: {e}");
                    summary.failed.push((group, e.to_string()));
                }
            }
            progress.inc(1);
        }

        progress.finish(format!(
            "{} done, {} skipped, {} failed",
            summary.completed.len(),
            summary.skipped.len(),
            summary.failed.len()
        ));
        summary
    }

    /// Copies the pass-through datasets.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a dataset is missing or cannot be copied.
    pub async fn pass_through(&self) -> Result<(), GenerateError> {
        for &id in ArtifactGroup::PassThrough.datasets() {
            self.store.copy_to_output(id, self.sink).await?;
        }
        Ok(())
    }

    /// Writes the borough boundaries and centres with platform availability.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a dataset fails to load or an artifact
    /// fails to write.
    pub async fn boroughs(&self) -> Result<(), GenerateError> {
        let boroughs = self.store.boroughs().await?;
        let platform = self.store.platform_availability().await?;

        let by_borough =
            platform_availability_by_borough(&platform, self.config.platform.window_months)?;
        log::info!("Platform availability by borough: {by_borough:?}");

        let boroughs = enrich_boroughs(boroughs, &by_borough);
        let centers = borough_centers(&boroughs);

        write_json(
            self.sink,
            BOROUGH_CENTERS_ARTIFACT,
            &to_feature_collection(&centers)?,
        )?;
        write_json(
            self.sink,
            DatasetId::BoroughBoundaries.as_ref(),
            &to_feature_collection(&boroughs)?,
        )?;
        Ok(())
    }

    /// Runs the station stages without writing anything: dedupe, label,
    /// project association, then ridership.
    async fn build_stations(&self) -> Result<Vec<LabeledStation>, GenerateError> {
        Ok(self.build_projects_and_stations().await?.1)
    }

    async fn build_projects_and_stations(
        &self,
    ) -> Result<(Vec<ProjectFeature>, Vec<LabeledStation>), GenerateError> {
        let supplement = self.store.project_supplement().await?;
        let projects = prepare_projects(self.store.projects().await?, &supplement);

        let stations = label_stations(dedupe_stations(self.store.stations().await?)?);
        let stations = associate_projects(
            stations,
            &projects,
            self.config.stations.project_max_distance_meters,
        );

        let stations = if self.skip.contains(&DatasetId::Ridership) {
            log::info!("Ridership is in the skip list, stations keep no ridership");
            stations
        } else {
            let ridership = self.store.ridership().await?;
            merge_ridership(stations, &ridership, &self.config.stations.ridership_month)
        };

        Ok((projects, stations))
    }

    /// Writes the projects and stations artifacts and returns the stations
    /// for neighborhood scoring.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a dataset fails to load, stations fail
    /// to merge, or an artifact fails to write.
    pub async fn stations(&self) -> Result<Vec<LabeledStation>, GenerateError> {
        let (projects, stations) = self.build_projects_and_stations().await?;

        write_json(
            self.sink,
            DatasetId::AdaProjects.as_ref(),
            &to_feature_collection(&projects)?,
        )?;
        write_json(
            self.sink,
            DatasetId::Stations.as_ref(),
            &stations_to_collection(&stations)?,
        )?;
        Ok(stations)
    }

    /// Scores neighborhoods against `stations` and writes them.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a dataset fails to load, a boundary is
    /// not polygonal, or the artifact fails to write.
    pub async fn neighborhoods(&self, stations: &[LabeledStation]) -> Result<(), GenerateError> {
        let census = self.store.census().await?;
        let neighborhoods = prepare_neighborhoods(self.store.neighborhoods().await?, &census)?;

        let scored = score_neighborhoods(
            neighborhoods,
            stations,
            &self.config.neighborhoods.scoring_params(),
        );

        write_json(
            self.sink,
            DatasetId::Neighborhoods.as_ref(),
            &scored_to_collection(&scored)?,
        )?;
        Ok(())
    }

    /// Colours the subway lines, appends the Staten Island Railway, and
    /// writes them.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a dataset fails to load or the artifact
    /// fails to write.
    pub async fn lines(&self) -> Result<(), GenerateError> {
        let sir_points = self.store.sir_line_points().await?;
        let lines = build_lines(self.store.subway_lines().await?, &sir_points);

        write_json(
            self.sink,
            DatasetId::SubwayLines.as_ref(),
            &to_feature_collection(&lines)?,
        )?;
        Ok(())
    }

    /// Aggregates equipment availability over the configured window and
    /// writes the trimmed inventory with stats.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if a dataset fails to load, the anchor
    /// month is invalid, or the artifact fails to write.
    pub async fn equipment(&self) -> Result<(), GenerateError> {
        let rows = self.store.equipment_availability().await?;
        let stats = aggregate_equipment(
            &rows,
            &self.config.equipment.anchor_month,
            self.config.equipment.window_months,
        )?;

        let summary = summarize_equipment(self.store.equipment_info().await?, &stats);
        write_json(
            self.sink,
            DatasetId::ElevatorsAndEscalators.as_ref(),
            &summary,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use subway_access_dataset::{MemorySink, null_progress};

    fn write(dir: &Path, id: DatasetId, contents: &str) {
        std::fs::write(id.definition().path_in(dir), contents).unwrap();
    }

    fn station(lon: f64, lat: f64, id: &str, complex: &str, name: &str, south: &str, north: &str) -> String {
        format!(
            r#"{{"type":"Feature","geometry":{{"type":"Point","coordinates":[{lon},{lat}]}},"properties":{{"station_id":"{id}","complex_id":"{complex}","stop_name":"{name}","daytime_routes":"G","ada_northbound":"{north}","ada_southbound":"{south}"}}}}"#
        )
    }

    /// Writes a small but complete datasets directory.
    fn seed(dir: &Path) {
        write(
            dir,
            DatasetId::EntrancesExits,
            r#"{"type":"FeatureCollection","features":[]}"#,
        );
        write(
            dir,
            DatasetId::BoroughBoundaries,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-73.93,40.80],[-73.87,40.80],[-73.87,40.86],[-73.93,40.86],[-73.93,40.80]]]},"properties":{"boroname":"Bronx"}},
                {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-74.26,40.50],[-74.05,40.50],[-74.05,40.65],[-74.26,40.65],[-74.26,40.50]]]},"properties":{"boroname":"Staten Island"}}
            ]}"#,
        );
        write(
            dir,
            DatasetId::PlatformAvailability,
            r#"[
                {"month":"2024-08-01T00:00:00.000","borough":"Bronx","minutes_platforms_available":"200","minutes_platforms_in_service":"100"},
                {"month":"2024-09-01T00:00:00.000","borough":"Bronx","minutes_platforms_available":"200","minutes_platforms_in_service":"100"}
            ]"#,
        );
        write(
            dir,
            DatasetId::Stations,
            &format!(
                r#"{{"type":"FeatureCollection","features":[{},{},{}]}}"#,
                station(-73.950, 40.700, "1", "10", "Flushing Av", "1", "1"),
                station(-73.950, 40.700, "2", "10", "Flushing Av", "1", "1"),
                station(-73.955, 40.705, "3", "11", "Myrtle-Willoughby", "0", "0"),
            ),
        );
        write(
            dir,
            DatasetId::AdaProjects,
            r##"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Point","coordinates":[-73.9551,40.7051]},"properties":{"name":"Myrtle-Willoughby","styleUrl":"#icon-1590-A52714-nodesc"}},
                {"type":"Feature","geometry":{"type":"Point","coordinates":[-73.70,40.60]},"properties":{"name":"Far Away","styleUrl":"#icon-1769-0288D1-nodesc"}}
            ]}"##,
        );
        write(
            dir,
            DatasetId::AdaProjectsSupplement,
            r#"[{"name":"Myrtle-Willoughby","type":"Elevator","details":"Two new elevators"}]"#,
        );
        write(
            dir,
            DatasetId::Ridership,
            r#"[{"station_complex_id":"10","ridership":"1,234"}]"#,
        );
        write(
            dir,
            DatasetId::Neighborhoods,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-73.96,40.69],[-73.94,40.69],[-73.94,40.71],[-73.96,40.71],[-73.96,40.69]]]},"properties":{"NTA2020":"BK0301","NTAName":"Williamsburg"}}
            ]}"#,
        );
        write(
            dir,
            DatasetId::Census2020,
            "GeoType,GeoID,Pop1\nNTA2020,BK0301,\"20,000\"\n",
        );
        write(
            dir,
            DatasetId::SubwayLines,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"LineString","coordinates":[[-73.95,40.70],[-73.95,40.72]]},"properties":{"rt_symbol":"G"}}
            ]}"#,
        );
        write(
            dir,
            DatasetId::SirLinePoints,
            r#"{"id":"SIR-1","points":[{"latitude":40.64,"longitude":-74.07},{"latitude":40.51,"longitude":-74.25}]}"#,
        );
        write(
            dir,
            DatasetId::EquipmentAvailability,
            "month,equipment_code,total_outages,scheduled_outages,unscheduled_outages,entrapments,am_peak_hours_available,am_peak_total_hours,pm_peak_hours_available,pm_peak_total_hours,_24_hour_hours_available,_24_hour_total_hours\n\
             2024-09-01T00:00:00.000,EL101,2,1,1,0,9,10,8,10,700,720\n",
        );
        write(
            dir,
            DatasetId::ElevatorsAndEscalators,
            r#"[
                {"station":"Flushing Av","trainno":"G","equipmentno":"EL101","equipmenttype":"EL","serving":"Street to platform","ADA":"Y","isactive":"Y","shortdescription":"ELEVATOR","linesservedbyelevator":"G","stationcomplexid":"10"},
                {"station":"Flushing Av","trainno":"G","equipmentno":"ES999","equipmenttype":"ES","serving":"Mezzanine","ADA":"N","isactive":"Y","shortdescription":"ESCALATOR","linesservedbyelevator":"G","stationcomplexid":"10"}
            ]"#,
        );
    }

    fn stations_by_name(sink: &MemorySink) -> serde_json::Map<String, serde_json::Value> {
        let stations = sink.get("mta-subway-stations-geojson").unwrap();
        stations["features"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| {
                (
                    f["properties"]["stop_name"].as_str().unwrap().to_string(),
                    f["properties"].clone(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn full_run_writes_every_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .run(&ArtifactGroup::all(), null_progress())
            .await;

        assert!(summary.is_success(), "failed groups: {:?}", summary.failed);
        assert_eq!(summary.completed, ArtifactGroup::all());
        assert_eq!(
            sink.names(),
            vec![
                "borough-boundaries-geojson",
                "borough-centers-geojson",
                "mta-ada-projects",
                "mta-elevators-and-escalators",
                "mta-subway-stations-geojson",
                "nyc-neighborhoods",
                "subway-entrances-exits",
                "subway-lines-geojson",
            ]
        );
    }

    #[tokio::test]
    async fn stations_are_deduped_labeled_and_enriched() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .run(&[ArtifactGroup::Stations], null_progress())
            .await;
        assert!(summary.is_success(), "failed groups: {:?}", summary.failed);

        let stations = stations_by_name(&sink);
        assert_eq!(stations.len(), 2, "duplicate platforms should merge");

        let flushing = &stations["Flushing Av"];
        assert_eq!(flushing["station_id"], "1,2");
        assert_eq!(flushing["ada"], "full");
        assert_eq!(flushing["ada_score"], 10);
        assert_eq!(flushing["ridership_month"], "September, 2024");
        assert_eq!(flushing["ridership_last_full_month"], 1234.0);

        let myrtle = &stations["Myrtle-Willoughby"];
        assert_eq!(myrtle["ada"], "no");
        assert!(myrtle.get("ridership_month").is_none());
        let projects = myrtle["ada_projects"].as_array().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0]["status"], "Ongoing");
        assert_eq!(projects[0]["type"], "Elevator");

        let all_projects = sink.get("mta-ada-projects").unwrap();
        let features = all_projects["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert!(features.iter().all(|f| f["id"].is_string()));
        assert_eq!(features[1]["properties"]["status"], "Completed");
    }

    #[tokio::test]
    async fn neighborhoods_are_scored_against_stations() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .run(&[ArtifactGroup::Neighborhoods], null_progress())
            .await;
        assert!(summary.is_success(), "failed groups: {:?}", summary.failed);
        assert!(sink.get("mta-subway-stations-geojson").is_none());

        let neighborhoods = sink.get("nyc-neighborhoods").unwrap();
        let feature = &neighborhoods["features"][0];
        assert_eq!(feature["geometry"]["type"], "MultiPolygon");

        let props = &feature["properties"];
        assert_eq!(props["NTAName"], "Williamsburg");
        assert_eq!(props["Pop1"], 20_000);
        assert_eq!(props["num_nearest_stations"], 2);
        assert_eq!(props["num_accessible_stations"], 1);
        assert_eq!(props["accessible_station_score"], 0.5);
        assert_eq!(props["accessible_station_score_by_pop"], 0.0);
    }

    #[tokio::test]
    async fn boroughs_lines_and_equipment_are_enriched() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .run(
                &[
                    ArtifactGroup::Boroughs,
                    ArtifactGroup::Lines,
                    ArtifactGroup::Equipment,
                ],
                null_progress(),
            )
            .await;
        assert!(summary.is_success(), "failed groups: {:?}", summary.failed);

        let centers = sink.get(BOROUGH_CENTERS_ARTIFACT).unwrap();
        assert_eq!(centers["features"][0]["properties"]["name"], "Bronx");
        assert_eq!(centers["features"][0]["properties"]["platform_availability"], 0.5);
        assert_eq!(centers["features"][1]["properties"]["platform_availability"], -1.0);

        let boundaries = sink.get("borough-boundaries-geojson").unwrap();
        assert_eq!(boundaries["features"][1]["id"], 1);

        let lines = sink.get("subway-lines-geojson").unwrap();
        let lines = lines["features"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["properties"]["color"], "#00933C");
        assert_eq!(lines[1]["properties"]["rt_symbol"], "SIR");

        let equipment = sink.get("mta-elevators-and-escalators").unwrap();
        assert_eq!(equipment[0]["stats"]["total_outages"], 2);
        assert_eq!(equipment[0]["stats"]["am_peak_availability"], 0.9);
        assert!(equipment[1].get("stats").is_none());
    }

    #[tokio::test]
    async fn missing_dataset_fails_only_its_group() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        std::fs::remove_file(DatasetStore::new(tmp.path()).path(DatasetId::EquipmentAvailability))
            .unwrap();
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .run(&ArtifactGroup::all(), null_progress())
            .await;

        assert!(!summary.is_success());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, ArtifactGroup::Equipment);
        assert!(summary.failed[0].1.contains("elevator-and-escalator-availability"));
        assert_eq!(summary.completed.len(), ArtifactGroup::all().len() - 1);
        assert!(sink.get("mta-elevators-and-escalators").is_none());
    }

    #[tokio::test]
    async fn failed_stations_block_neighborhoods() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        std::fs::remove_file(DatasetStore::new(tmp.path()).path(DatasetId::Stations)).unwrap();
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .run(
                &[ArtifactGroup::Stations, ArtifactGroup::Neighborhoods],
                null_progress(),
            )
            .await;

        let failed: Vec<_> = summary.failed.iter().map(|(group, _)| *group).collect();
        assert_eq!(failed, vec![ArtifactGroup::Stations]);
        assert_eq!(
            summary.skipped,
            vec![(
                ArtifactGroup::Neighborhoods,
                SkipReason::Prerequisite(ArtifactGroup::Stations)
            )]
        );
        assert_eq!(
            summary.skipped[0].1.to_string(),
            "the stations group did not complete"
        );
        assert!(sink.get("nyc-neighborhoods").is_none());
    }

    #[tokio::test]
    async fn skipped_stations_skip_neighborhoods() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .with_skip([DatasetId::AdaProjects])
            .run(
                &[ArtifactGroup::Stations, ArtifactGroup::Neighborhoods],
                null_progress(),
            )
            .await;

        assert!(summary.is_success());
        assert_eq!(
            summary.skipped,
            vec![
                (ArtifactGroup::Stations, SkipReason::Dataset(DatasetId::AdaProjects)),
                (
                    ArtifactGroup::Neighborhoods,
                    SkipReason::Prerequisite(ArtifactGroup::Stations)
                ),
            ]
        );
    }

    #[tokio::test]
    async fn skip_list_skips_dependent_groups() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path());
        let sink = MemorySink::new();

        let summary = Pipeline::new(DatasetStore::new(tmp.path()), &sink, PipelineConfig::default())
            .with_skip([DatasetId::ElevatorsAndEscalators, DatasetId::Ridership])
            .run(&[ArtifactGroup::Stations, ArtifactGroup::Equipment], null_progress())
            .await;

        assert!(summary.is_success());
        assert_eq!(summary.completed, vec![ArtifactGroup::Stations]);
        assert_eq!(
            summary.skipped,
            vec![(
                ArtifactGroup::Equipment,
                SkipReason::Dataset(DatasetId::ElevatorsAndEscalators)
            )]
        );
        let stations = stations_by_name(&sink);
        assert!(stations["Flushing Av"].get("ridership_month").is_none());
    }

    #[tokio::test]
    async fn execute_writes_into_output_dir() {
        let datasets = tempfile::tempdir().unwrap();
        seed(datasets.path());
        let out = tempfile::tempdir().unwrap();
        let options = RunOptions {
            datasets_dir: Some(datasets.path().to_path_buf()),
            output_dir: Some(out.path().join("gis-data")),
            ..RunOptions::default()
        };

        let summary = options.execute(Target::Lines, null_progress()).await.unwrap();
        assert_eq!(summary.completed, vec![ArtifactGroup::Lines]);

        let written = std::fs::read_to_string(out.path().join("gis-data/subway-lines-geojson.json"))
            .unwrap();
        let lines: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(lines["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn execute_rejects_missing_config() {
        let out = tempfile::tempdir().unwrap();
        let options = RunOptions {
            config: Some(out.path().join("nope.toml")),
            output_dir: Some(out.path().to_path_buf()),
            ..RunOptions::default()
        };
        let err = options.execute(Target::All, null_progress()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Io(_)), "unexpected error: {err}");
    }

    #[test]
    fn targets_expand_to_groups() {
        assert_eq!(Target::All.groups(), ArtifactGroup::all());
        assert_eq!(
            Target::Neighborhoods.groups(),
            vec![ArtifactGroup::Stations, ArtifactGroup::Neighborhoods]
        );
        assert!(Target::ALL.iter().all(|t| !t.groups().is_empty()));
    }

    #[test]
    fn groups_parse_from_kebab_case() {
        assert_eq!(
            "pass-through".parse::<ArtifactGroup>().unwrap(),
            ArtifactGroup::PassThrough
        );
        assert_eq!(ArtifactGroup::Neighborhoods.to_string(), "neighborhoods");
    }
}
