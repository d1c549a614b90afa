//! The "load dataset by id" contract.
//!
//! [`DatasetStore`] resolves an id through the registry, checks the file
//! is present and of the expected type, and parses it into typed records.
//! Any missing file or parse failure is a [`DatasetError`]; callers never
//! receive silently emptied data.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use subway_access_dataset_models::{
    BoroughFeature, CensusRecord, EquipmentAvailabilityRecord, EquipmentInfo, LinePointsFile,
    NeighborhoodFeature, PlatformAvailabilityRecord, ProjectFeature, ProjectSupplement,
    RidershipRecord, StationFeature, SubwayLineFeature,
};
use subway_access_spatial::{Feature, features_from_collection};

use crate::{ArtifactSink, DatasetError, DatasetId, DatasetType};

/// Reads datasets from a directory laid out as `<id><ext>`.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    /// Creates a store over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The datasets directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the loader reads for `id`.
    #[must_use]
    pub fn path(&self, id: DatasetId) -> PathBuf {
        id.definition().path_in(&self.dir)
    }

    /// Whether the file for `id` is present.
    #[must_use]
    pub fn exists(&self, id: DatasetId) -> bool {
        self.path(id).is_file()
    }

    async fn read(&self, id: DatasetId, expected: DatasetType) -> Result<String, DatasetError> {
        let definition = id.definition();
        let accepted = match expected {
            DatasetType::Geojson => definition.dataset_type.is_geojson(),
            other => definition.dataset_type == other,
        };
        if !accepted {
            return Err(DatasetError::WrongType {
                id,
                expected,
                actual: definition.dataset_type,
            });
        }

        let path = definition.path_in(&self.dir);
        if !tokio::fs::try_exists(&path).await? {
            return Err(DatasetError::Missing { id, path });
        }

        log::debug!("Loading dataset {id} from {}", path.display());
        Ok(tokio::fs::read_to_string(&path).await?)
    }

    /// Loads a JSON dataset into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset is not JSON, is missing, or
    /// does not deserialize into `T`.
    pub async fn load_json<T: DeserializeOwned>(&self, id: DatasetId) -> Result<T, DatasetError> {
        let text = self.read(id, DatasetType::Json).await?;
        serde_json::from_str(&text).map_err(|e| DatasetError::invalid(id, e))
    }

    /// Loads a `GeoJSON` (or converted KML) dataset as a raw feature
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset is not `GeoJSON`, is missing,
    /// or is not a `FeatureCollection`.
    pub async fn load_feature_collection(
        &self,
        id: DatasetId,
    ) -> Result<geojson::FeatureCollection, DatasetError> {
        let text = self.read(id, DatasetType::Geojson).await?;
        let geojson: geojson::GeoJson = text.parse().map_err(|e| DatasetError::invalid(id, e))?;
        geojson::FeatureCollection::try_from(geojson).map_err(|e| DatasetError::invalid(id, e))
    }

    /// Loads a `GeoJSON` dataset into typed features.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the collection fails to load or any
    /// feature has the wrong geometry type or malformed properties.
    pub async fn load_features<G, P>(&self, id: DatasetId) -> Result<Vec<Feature<G, P>>, DatasetError>
    where
        G: TryFrom<geo::Geometry<f64>>,
        G::Error: std::fmt::Display,
        P: DeserializeOwned,
    {
        let collection = self.load_feature_collection(id).await?;
        let features = features_from_collection(collection).map_err(|e| DatasetError::invalid(id, e))?;
        log::info!("Loaded {} features from {id}", features.len());
        Ok(features)
    }

    /// Loads a CSV dataset, deserializing each row into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset is not CSV, is missing, or a
    /// row does not deserialize.
    pub async fn load_csv<T: DeserializeOwned>(&self, id: DatasetId) -> Result<Vec<T>, DatasetError> {
        let text = self.read(id, DatasetType::Csv).await?;
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| DatasetError::invalid(id, e))?;
        log::info!("Loaded {} rows from {id}", rows.len());
        Ok(rows)
    }

    /// Station points.
    ///
    /// # Errors
    ///
    /// See [`Self::load_features`].
    pub async fn stations(&self) -> Result<Vec<StationFeature>, DatasetError> {
        self.load_features(DatasetId::Stations).await
    }

    /// Accessibility project placemarks.
    ///
    /// # Errors
    ///
    /// See [`Self::load_features`].
    pub async fn projects(&self) -> Result<Vec<ProjectFeature>, DatasetError> {
        self.load_features(DatasetId::AdaProjects).await
    }

    /// Hand-curated project details.
    ///
    /// # Errors
    ///
    /// See [`Self::load_json`].
    pub async fn project_supplement(&self) -> Result<Vec<ProjectSupplement>, DatasetError> {
        self.load_json(DatasetId::AdaProjectsSupplement).await
    }

    /// Neighborhood boundaries.
    ///
    /// # Errors
    ///
    /// See [`Self::load_features`].
    pub async fn neighborhoods(&self) -> Result<Vec<NeighborhoodFeature>, DatasetError> {
        self.load_features(DatasetId::Neighborhoods).await
    }

    /// Borough boundaries.
    ///
    /// # Errors
    ///
    /// See [`Self::load_features`].
    pub async fn boroughs(&self) -> Result<Vec<BoroughFeature>, DatasetError> {
        self.load_features(DatasetId::BoroughBoundaries).await
    }

    /// Subway line geometry.
    ///
    /// # Errors
    ///
    /// See [`Self::load_features`].
    pub async fn subway_lines(&self) -> Result<Vec<SubwayLineFeature>, DatasetError> {
        self.load_features(DatasetId::SubwayLines).await
    }

    /// Census rows, with numeric columns parsed.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the CSV fails to load or a row has no
    /// `GeoType`.
    pub async fn census(&self) -> Result<Vec<CensusRecord>, DatasetError> {
        let id = DatasetId::Census2020;
        let rows: Vec<BTreeMap<String, String>> = self.load_csv(id).await?;
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                CensusRecord::from_row(row)
                    .ok_or_else(|| DatasetError::invalid(id, format!("row #{i} has no GeoType")))
            })
            .collect()
    }

    /// Monthly elevator and escalator availability rows.
    ///
    /// # Errors
    ///
    /// See [`Self::load_csv`].
    pub async fn equipment_availability(
        &self,
    ) -> Result<Vec<EquipmentAvailabilityRecord>, DatasetError> {
        self.load_csv(DatasetId::EquipmentAvailability).await
    }

    /// Static elevator and escalator inventory.
    ///
    /// # Errors
    ///
    /// See [`Self::load_json`].
    pub async fn equipment_info(&self) -> Result<Vec<EquipmentInfo>, DatasetError> {
        self.load_json(DatasetId::ElevatorsAndEscalators).await
    }

    /// Ridership per station complex for the last full month.
    ///
    /// # Errors
    ///
    /// See [`Self::load_json`].
    pub async fn ridership(&self) -> Result<Vec<RidershipRecord>, DatasetError> {
        self.load_json(DatasetId::Ridership).await
    }

    /// Monthly platform availability per borough.
    ///
    /// # Errors
    ///
    /// See [`Self::load_json`].
    pub async fn platform_availability(
        &self,
    ) -> Result<Vec<PlatformAvailabilityRecord>, DatasetError> {
        self.load_json(DatasetId::PlatformAvailability).await
    }

    /// Hand-digitized Staten Island Railway points.
    ///
    /// # Errors
    ///
    /// See [`Self::load_json`].
    pub async fn sir_line_points(&self) -> Result<LinePointsFile, DatasetError> {
        self.load_json(DatasetId::SirLinePoints).await
    }

    /// Passes a dataset file through to `sink` unchanged, under its id.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset is missing or the copy fails.
    pub async fn copy_to_output(
        &self,
        id: DatasetId,
        sink: &dyn ArtifactSink,
    ) -> Result<(), DatasetError> {
        let from = self.path(id);
        if !tokio::fs::try_exists(&from).await? {
            return Err(DatasetError::Missing { id, path: from });
        }
        sink.copy(id.as_ref(), &from)
    }
}
