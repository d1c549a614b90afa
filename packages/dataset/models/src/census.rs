//! 2020 census demographic rows.
//!
//! The census CSV is wide (dozens of age/sex columns) and only a couple
//! of columns drive the pipeline, so rows keep every column as a JSON
//! value: identifier columns stay strings, numeric columns become
//! numbers, and empty cells become `null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::de::parse_loose_number;

/// Columns that are identifiers or labels, never parsed as numbers.
const TEXT_COLUMNS: &[&str] = &[
    "Year", "GeoType", "Borough", "GeoID", "BCT2020", "Name", "CDType", "NTAType",
];

/// Geography type tag for neighborhood tabulation areas.
pub const NTA_GEO_TYPE: &str = "NTA2020";

/// A single census row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusRecord {
    /// Geography type (`"NTA2020"`, `"Boro"`, ...).
    #[serde(rename = "GeoType")]
    pub geo_type: String,
    /// Geography identifier, the neighborhood join key for NTA rows.
    #[serde(rename = "GeoID", default)]
    pub geo_id: Option<String>,
    /// Every other column.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl CensusRecord {
    /// Builds a record from a raw CSV row (header -> cell).
    ///
    /// Returns `None` if the row has no `GeoType`.
    #[must_use]
    pub fn from_row(row: BTreeMap<String, String>) -> Option<Self> {
        let mut geo_type = None;
        let mut geo_id = None;
        let mut fields = BTreeMap::new();

        for (column, raw) in row {
            let value = raw.trim();
            match column.as_str() {
                "GeoType" => geo_type = Some(value.to_string()),
                "GeoID" => geo_id = (!value.is_empty()).then(|| value.to_string()),
                _ => {
                    let json = if value.is_empty() {
                        serde_json::Value::Null
                    } else if TEXT_COLUMNS.contains(&column.as_str()) {
                        serde_json::Value::String(value.to_string())
                    } else {
                        numeric_cell(value)
                    };
                    fields.insert(column, json);
                }
            }
        }

        Some(Self {
            geo_type: geo_type.filter(|t| !t.is_empty())?,
            geo_id,
            fields,
        })
    }

    /// The NTA code this row describes, if it is a neighborhood row.
    #[must_use]
    pub fn nta_code(&self) -> Option<&str> {
        if self.geo_type == NTA_GEO_TYPE {
            self.geo_id.as_deref()
        } else {
            None
        }
    }

    /// Total population (`Pop1`), if present.
    #[must_use]
    pub fn population(&self) -> Option<f64> {
        self.fields.get("Pop1").and_then(serde_json::Value::as_f64)
    }
}

/// Integers stay integers so counts serialize without a trailing `.0`.
fn numeric_cell(value: &str) -> serde_json::Value {
    let cleaned = value.replace(',', "");
    if let Ok(int) = cleaned.parse::<i64>() {
        return serde_json::Value::from(int);
    }
    parse_loose_number(value)
        .and_then(serde_json::Number::from_f64)
        .map_or_else(
            || serde_json::Value::String(value.to_string()),
            serde_json::Value::Number,
        )
}
