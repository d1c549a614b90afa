#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed dataset records for the subway accessibility pipeline.
//!
//! One property/record type per upstream dataset. Fields the pipeline
//! reads are typed; everything else rides along in a flattened
//! `extra` map so artifacts keep every upstream column.

pub mod borough;
pub mod census;
pub mod equipment;
pub mod line;
pub mod neighborhood;
pub mod platform;
pub mod project;
pub mod ridership;
pub mod station;

pub use borough::{BoroughCenterProperties, BoroughFeature, BoroughProperties};
pub use census::CensusRecord;
pub use equipment::{
    AggregateStats, EquipmentAvailabilityRecord, EquipmentInfo, EquipmentSummary, EquipmentType,
    YesNo,
};
pub use line::{LinePoint, LinePointsFile, SubwayLineFeature, SubwayLineProperties};
pub use neighborhood::{NeighborhoodFeature, NeighborhoodProperties};
pub use platform::PlatformAvailabilityRecord;
pub use project::{
    ProjectAssociation, ProjectFeature, ProjectProperties, ProjectStatus, ProjectSupplement,
};
pub use ridership::RidershipRecord;
pub use station::{AccessibilityClass, StationFeature, StationProperties};

/// Open map of pass-through properties.
pub type ExtraProperties = serde_json::Map<String, serde_json::Value>;

/// Serde helpers for upstream quirks (numbers delivered as strings).
pub mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    fn parse_number(raw: &str) -> Option<f64> {
        let cleaned = raw.trim().replace(',', "");
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse().ok()
    }

    /// Deserializes an `f64` from either a JSON number or a numeric string
    /// (thousands separators allowed).
    ///
    /// # Errors
    ///
    /// Fails if the value is missing, empty, or not numeric.
    pub fn number_from_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => parse_number(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid number: {s:?}"))),
        }
    }

    /// Like [`number_from_string`] but maps empty strings and nulls to
    /// `None`.
    ///
    /// # Errors
    ///
    /// Fails if a non-empty value is not numeric.
    pub fn option_number_from_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrString::String(s)) => parse_number(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid number: {s:?}"))),
        }
    }

    /// Parses a loosely formatted numeric cell (`"1,234"`, `" 5.5 "`).
    #[must_use]
    pub fn parse_loose_number(raw: &str) -> Option<f64> {
        parse_number(raw)
    }

    #[cfg(test)]
    mod tests {
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "super::number_from_string")]
            value: f64,
            #[serde(default, deserialize_with = "super::option_number_from_string")]
            maybe: Option<f64>,
        }

        #[test]
        fn accepts_numeric_strings_and_numbers() {
            let row: Row = serde_json::from_str(r#"{"value": "1,234.5", "maybe": 2}"#).unwrap();
            assert!((row.value - 1234.5).abs() < f64::EPSILON);
            assert_eq!(row.maybe, Some(2.0));
        }

        #[test]
        fn empty_optional_is_none() {
            let row: Row = serde_json::from_str(r#"{"value": 3, "maybe": ""}"#).unwrap();
            assert_eq!(row.maybe, None);
            let row: Row = serde_json::from_str(r#"{"value": 3}"#).unwrap();
            assert_eq!(row.maybe, None);
        }

        #[test]
        fn rejects_garbage() {
            assert!(serde_json::from_str::<Row>(r#"{"value": "abc"}"#).is_err());
            assert!(serde_json::from_str::<Row>(r#"{"value": ""}"#).is_err());
        }
    }
}
