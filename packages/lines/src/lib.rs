#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Subway line colouring.
//!
//! Every line segment gets the MTA trunk-line colour of its route, and the
//! Staten Island Railway, which the city's line dataset lacks, is added
//! from a hand-digitized points file.

use geo::Geometry;
use subway_access_dataset_models::{LinePointsFile, SubwayLineFeature, SubwayLineProperties};
use subway_access_spatial::Feature;

/// Route symbol of the Staten Island Railway.
pub const SIR_ROUTE: &str = "SIR";

/// MTA trunk-line colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::EnumIter)]
pub enum MtaColor {
    /// 1 / 2 / 3.
    #[strum(serialize = "#EE352E")]
    Red,
    /// 4 / 5 / 6.
    #[strum(serialize = "#6CBE45")]
    Green,
    /// A / C / E.
    #[strum(serialize = "#0039A6")]
    Blue,
    /// B / D / F / M.
    #[strum(serialize = "#FF6319")]
    Orange,
    /// 7.
    #[strum(serialize = "#B933AD")]
    Purple,
    /// G.
    #[strum(serialize = "#00933C")]
    LimeGreen,
    /// N / Q / R / W.
    #[strum(serialize = "#FCCC0A")]
    Yellow,
    /// L, shuttles, and anything unrecognized.
    #[strum(serialize = "#A7A9AC")]
    Gray,
    /// J / Z.
    #[strum(serialize = "#996633")]
    Brown,
    /// Staten Island Railway.
    #[strum(serialize = "#007AC7")]
    SirBlue,
}

/// Colour of a route symbol.
#[must_use]
pub fn route_color(route: &str) -> MtaColor {
    match route {
        "1" | "2" | "3" => MtaColor::Red,
        "4" | "5" | "6" => MtaColor::Green,
        "7" => MtaColor::Purple,
        "A" | "C" | "E" => MtaColor::Blue,
        "B" | "D" | "F" | "M" => MtaColor::Orange,
        "G" => MtaColor::LimeGreen,
        "J" | "Z" => MtaColor::Brown,
        "N" | "Q" | "R" | "W" => MtaColor::Yellow,
        SIR_ROUTE => MtaColor::SirBlue,
        _ => MtaColor::Gray,
    }
}

/// Sets `color` on every line with a route symbol.
#[must_use]
pub fn colorize_lines(lines: Vec<SubwayLineFeature>) -> Vec<SubwayLineFeature> {
    lines
        .into_iter()
        .map(|mut line| {
            if let Some(route) = line.properties.rt_symbol.as_deref().filter(|r| !r.is_empty()) {
                line.properties.color = Some(route_color(route).to_string());
            }
            line
        })
        .collect()
}

/// Builds a `LineString` feature for a hand-digitized route.
#[must_use]
pub fn synthetic_line_feature(points: &LinePointsFile, route: &str) -> SubwayLineFeature {
    Feature::new(
        Geometry::LineString(points.to_line_string()),
        SubwayLineProperties {
            rt_symbol: Some(route.to_string()),
            color: Some(route_color(route).to_string()),
            trip_id: Some(points.id.clone()),
            extra: serde_json::Map::new(),
        },
    )
}

/// Colours the city's lines and appends the Staten Island Railway.
#[must_use]
pub fn build_lines(lines: Vec<SubwayLineFeature>, sir_points: &LinePointsFile) -> Vec<SubwayLineFeature> {
    let mut lines = colorize_lines(lines);
    log::info!(
        "Appending {SIR_ROUTE} line ({} points) to {} line segments",
        sir_points.points.len(),
        lines.len()
    );
    lines.push(synthetic_line_feature(sir_points, SIR_ROUTE));
    lines
}
