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

//! Precomputed terrain profile along a flight route.
//!
//! The elevation grid and the route spans of each airspace are produced
//! upstream; the viewer only loads, validates and draws them. The file is
//! JSON with camelCase keys:
//!
//! ```json
//! {
//!   "route": [{ "latitude": 47.45, "longitude": -122.31 }],
//!   "grid": [{ "latitude": 47.45, "longitude": -122.31, "elevation": 130.0,
//!              "distanceFromPath": 0.0, "progress": 0.0 }],
//!   "airspaces": [{ "name": "SEATTLE CLASS B", "class": "B",
//!                   "startProgress": 0.0, "endProgress": 0.2 }]
//! }
//! ```

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ElevationGridCell, GeoPoint, PositionedAirspace};

/// Errors that can occur while loading a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} out of range at index {index}: {value}")]
    OutOfRange {
        field: &'static str,
        index: usize,
        value: f64,
    },
}

/// Route, elevation grid and positioned airspaces for one flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainScene {
    #[serde(default)]
    pub route: Vec<GeoPoint>,
    #[serde(default)]
    pub grid: Vec<ElevationGridCell>,
    #[serde(default)]
    pub airspaces: Vec<PositionedAirspace>,
}

impl TerrainScene {
    /// Parse and validate a scene from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let scene: Self = serde_json::from_str(text)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load and validate a scene file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SceneError::NotFound(path.to_path_buf())
            } else {
                SceneError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let scene = Self::from_json(&text)?;
        info!(
            "Loaded scene {:?}: {} route points, {} grid cells, {} airspaces",
            path,
            scene.route.len(),
            scene.grid.len(),
            scene.airspaces.len()
        );
        Ok(scene)
    }

    /// Check the range constraints: progress values in [0, 1] and valid coordinates.
    ///
    /// Unknown elevations are allowed.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, point) in self.route.iter().enumerate() {
            check_coordinates(point.latitude, point.longitude, index)?;
        }

        for (index, cell) in self.grid.iter().enumerate() {
            check_coordinates(cell.latitude, cell.longitude, index)?;
            check_range("grid.progress", index, cell.progress, 0.0, 1.0)?;
            if !cell.distance_from_path.is_finite() {
                return Err(SceneError::OutOfRange {
                    field: "grid.distanceFromPath",
                    index,
                    value: cell.distance_from_path,
                });
            }
        }

        for (index, airspace) in self.airspaces.iter().enumerate() {
            check_range("airspaces.startProgress", index, airspace.start_progress, 0.0, 1.0)?;
            check_range("airspaces.endProgress", index, airspace.end_progress, 0.0, 1.0)?;
        }

        Ok(())
    }

    /// Whether there is anything to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route.is_empty() && self.grid.is_empty()
    }

    /// Total great-circle length of the route in meters.
    #[must_use]
    pub fn route_length_m(&self) -> f64 {
        self.route
            .windows(2)
            .map(|pair| pair[0].haversine_distance(&pair[1]))
            .sum()
    }

    /// Point on the route at a normalized progress value.
    ///
    /// Progress is mapped onto cumulative great-circle distance and clamped to
    /// [0, 1]. Returns `None` for an empty route.
    #[must_use]
    pub fn point_at_progress(&self, progress: f64) -> Option<GeoPoint> {
        let first = *self.route.first()?;
        let total = self.route_length_m();
        if total <= 0.0 {
            return Some(first);
        }

        let target = progress.clamp(0.0, 1.0) * total;
        let mut travelled = 0.0;

        for pair in self.route.windows(2) {
            let leg = pair[0].haversine_distance(&pair[1]);
            if travelled + leg >= target {
                let t = if leg > 0.0 { (target - travelled) / leg } else { 0.0 };
                return Some(GeoPoint::new(
                    pair[0].latitude + (pair[1].latitude - pair[0].latitude) * t,
                    pair[0].longitude + (pair[1].longitude - pair[0].longitude) * t,
                ));
            }
            travelled += leg;
        }

        self.route.last().copied()
    }

    /// Route points between two progress values, inclusive of the interpolated ends.
    #[must_use]
    pub fn route_segment(&self, start: f64, end: f64) -> Vec<GeoPoint> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let total = self.route_length_m();

        let mut points = Vec::new();
        points.extend(self.point_at_progress(start));

        if total > 0.0 {
            let mut travelled = 0.0;
            for pair in self.route.windows(2) {
                travelled += pair[0].haversine_distance(&pair[1]);
                let progress = travelled / total;
                if progress > start && progress < end {
                    points.push(pair[1]);
                }
            }
        }

        points.extend(self.point_at_progress(end));
        points
    }

    /// Elevation range of the grid in meters, ignoring unknown cells.
    #[must_use]
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        self.grid
            .iter()
            .filter_map(|cell| cell.elevation)
            .fold(None, |range, elevation| match range {
                None => Some((elevation, elevation)),
                Some((min, max)) => Some((min.min(elevation), max.max(elevation))),
            })
    }

    /// Case-insensitive search over positioned airspace names.
    #[must_use]
    pub fn find_airspace(&self, query: &str) -> Option<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.airspaces
            .iter()
            .position(|a| a.airspace.name.to_lowercase().contains(&needle))
    }
}

fn check_coordinates(latitude: f64, longitude: f64, index: usize) -> Result<(), SceneError> {
    check_range("latitude", index, latitude, -90.0, 90.0)?;
    check_range("longitude", index, longitude, -180.0, 180.0)
}

fn check_range(field: &'static str, index: usize, value: f64, min: f64, max: f64) -> Result<(), SceneError> {
    // NaN fails this comparison too
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(SceneError::OutOfRange { field, index, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_file;

    const SCENE: &str = r#"{
        "route": [
            { "latitude": 47.0, "longitude": -122.0 },
            { "latitude": 48.0, "longitude": -122.0 }
        ],
        "grid": [
            { "latitude": 47.0, "longitude": -122.0, "elevation": 120.5, "distanceFromPath": 0.0, "progress": 0.0 },
            { "latitude": 47.5, "longitude": -122.0, "elevation": null, "distanceFromPath": 0.0, "progress": 0.5 },
            { "latitude": 48.0, "longitude": -122.0, "elevation": 870.0, "distanceFromPath": 0.0, "progress": 1.0 }
        ],
        "airspaces": [
            { "name": "Seattle Class B", "class": "B", "lowerLimitFt": 0, "upperLimitFt": 10000,
              "startProgress": 0.0, "endProgress": 0.4 }
        ]
    }"#;

    #[test]
    fn test_parse_accepts_null_elevation() {
        let scene = TerrainScene::from_json(SCENE).unwrap();
        assert_eq!(scene.grid.len(), 3);
        assert_eq!(scene.grid[1].elevation, None);
        assert_eq!(scene.elevation_range(), Some((120.5, 870.0)));
    }

    #[test]
    fn test_progress_out_of_range_rejected() {
        let mut scene = TerrainScene::from_json(SCENE).unwrap();
        scene.grid[2].progress = 1.2;
        assert!(matches!(
            scene.validate(),
            Err(SceneError::OutOfRange {
                field: "grid.progress",
                index: 2,
                ..
            })
        ));

        let mut scene = TerrainScene::from_json(SCENE).unwrap();
        scene.airspaces[0].end_progress = -0.1;
        assert!(matches!(
            scene.validate(),
            Err(SceneError::OutOfRange {
                field: "airspaces.endProgress",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_progress_rejected() {
        let mut scene = TerrainScene::from_json(SCENE).unwrap();
        scene.grid[0].progress = f64::NAN;
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_point_at_progress_midpoint() {
        let scene = TerrainScene::from_json(SCENE).unwrap();
        let mid = scene.point_at_progress(0.5).unwrap();
        assert!((mid.latitude - 47.5).abs() < 1e-6);
        assert!((mid.longitude + 122.0).abs() < 1e-9);

        let end = scene.point_at_progress(2.0).unwrap();
        assert!((end.latitude - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_route_segment_includes_inner_vertices() {
        let scene = TerrainScene {
            route: vec![
                GeoPoint::new(47.0, -122.0),
                GeoPoint::new(47.5, -122.0),
                GeoPoint::new(48.0, -122.0),
            ],
            ..Default::default()
        };

        let segment = scene.route_segment(0.25, 0.75);
        assert_eq!(segment.len(), 3);
        assert!((segment[0].latitude - 47.25).abs() < 1e-6);
        assert!((segment[1].latitude - 47.5).abs() < 1e-9);
        assert!((segment[2].latitude - 47.75).abs() < 1e-6);
    }

    #[test]
    fn test_find_airspace_case_insensitive() {
        let scene = TerrainScene::from_json(SCENE).unwrap();
        assert_eq!(scene.find_airspace("class b"), Some(0));
        assert_eq!(scene.find_airspace("  SEATTLE "), Some(0));
        assert_eq!(scene.find_airspace("Portland"), None);
        assert_eq!(scene.find_airspace("   "), None);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let result = TerrainScene::load(std::env::temp_dir().join("no-such-dir/scene.json")).await;
        assert!(matches!(result, Err(SceneError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let path = temp_file("scene.json", SCENE);
        let scene = TerrainScene::load(&path).await.unwrap();
        assert_eq!(scene.airspaces[0].airspace.upper_limit_ft, Some(10000.0));
        assert!(!scene.is_empty());
    }
}
