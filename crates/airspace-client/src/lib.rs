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

//! Data plumbing for the airspace viewer.
//!
//! This library holds everything the viewer does that is not drawing:
//!
//! - **Model**: airspace files, elevation grid cells and positioned airspaces
//! - **Loader**: best-effort aggregation of the US (local) and Canadian
//!   (remote) airspace text files
//! - **Refresh**: the server-side regeneration request and the state machine
//!   behind the refresh button
//! - **Scene**: the precomputed terrain profile consumed by the map and 3D views
//!
//! # Loading airspace files
//!
//! ```no_run
//! use airspace_client::{AirspaceLoader, LoaderConfig, SourceSelector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let loader = AirspaceLoader::new(LoaderConfig::default());
//!     for file in loader.load(SourceSelector::All).await {
//!         println!("{} [{}]: {} bytes", file.name, file.source, file.content.len());
//!     }
//! }
//! ```
//!
//! # Driving the refresh state machine
//!
//! ```
//! use airspace_client::refresh::{RefreshControl, RefreshStatus};
//!
//! let mut control = RefreshControl::new();
//! assert!(control.try_begin(false));
//! // A second click while the request is in flight is ignored
//! assert!(!control.try_begin(false));
//!
//! control.finish(Err("Failed to update airspace data".to_string()), chrono::Utc::now());
//! assert!(matches!(control.status(), RefreshStatus::Failed { .. }));
//! ```

pub mod loader;
pub mod model;
pub mod refresh;
pub mod scene;

#[cfg(test)]
pub(crate) mod test_support;

pub use loader::{AirspaceLoader, LoadError, LoaderConfig};
pub use model::{
    AirspaceFile, AirspaceRecord, AirspaceSource, ElevationGridCell, GeoPoint,
    ParseSelectorError, PositionedAirspace, SourceSelector,
};
pub use refresh::{RefreshClient, RefreshControl, RefreshError, RefreshStatus, UpdateRequest, UpdateResponse};
pub use scene::{SceneError, TerrainScene};
