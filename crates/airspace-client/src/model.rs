// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core data types shared by the loader, the scene and the viewer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Country an airspace dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirspaceSource {
    /// United States, read from a local file.
    #[serde(rename = "US")]
    Us,
    /// Canada, fetched from a remote URL.
    #[serde(rename = "CA")]
    Ca,
}

impl AirspaceSource {
    /// Short tag used in logs, UI labels and refresh requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Ca => "CA",
        }
    }
}

impl fmt::Display for AirspaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which datasets to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceSelector {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "CA")]
    Ca,
    #[default]
    #[serde(rename = "ALL")]
    All,
}

impl SourceSelector {
    /// All selectors, in the order they are offered in the UI.
    pub const ALL: [Self; 3] = [Self::Us, Self::Ca, Self::All];

    /// Whether this selector includes the given source.
    #[must_use]
    pub const fn includes(self, source: AirspaceSource) -> bool {
        matches!(
            (self, source),
            (Self::All, _) | (Self::Us, AirspaceSource::Us) | (Self::Ca, AirspaceSource::Ca)
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Ca => "CA",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for SourceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a selector string is not one of US, CA or ALL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown airspace source '{0}' (expected US, CA or ALL)")]
pub struct ParseSelectorError(pub String);

impl FromStr for SourceSelector {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Self::Us),
            "CA" => Ok(Self::Ca),
            "ALL" => Ok(Self::All),
            _ => Err(ParseSelectorError(s.to_string())),
        }
    }
}

/// Raw airspace definition text tagged with where it came from.
///
/// The content is not parsed here; it is handed to whatever consumes it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirspaceFile {
    pub content: String,
    pub source: AirspaceSource,
    pub name: String,
}

impl AirspaceFile {
    /// Number of lines in the file content.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to another point in meters.
    #[must_use]
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

/// One sample of a terrain cross-section along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationGridCell {
    pub latitude: f64,
    pub longitude: f64,
    /// Terrain elevation in meters; `None` when no data was available.
    pub elevation: Option<f64>,
    /// Signed offset from the route centre line in meters (left is negative).
    pub distance_from_path: f64,
    /// Normalized position along the route, 0.0 at the start and 1.0 at the end.
    pub progress: f64,
}

/// An airspace volume as delivered by the airspace pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirspaceRecord {
    pub name: String,
    /// Airspace class or type, e.g. "C", "D", "R", "TFR".
    #[serde(default)]
    pub class: String,
    /// Floor in feet MSL, when known.
    #[serde(default)]
    pub lower_limit_ft: Option<f64>,
    /// Ceiling in feet MSL, when known.
    #[serde(default)]
    pub upper_limit_ft: Option<f64>,
}

/// An airspace plus the span of the route it intersects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedAirspace {
    #[serde(flatten)]
    pub airspace: AirspaceRecord,
    pub start_progress: f64,
    pub end_progress: f64,
}

impl PositionedAirspace {
    /// The intersected span ordered low to high.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        if self.start_progress <= self.end_progress {
            (self.start_progress, self.end_progress)
        } else {
            (self.end_progress, self.start_progress)
        }
    }

    /// Whether the given progress value falls within this airspace's span.
    #[must_use]
    pub fn covers(&self, progress: f64) -> bool {
        let (start, end) = self.span();
        progress >= start && progress <= end
    }
}
