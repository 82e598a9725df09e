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

//! Best-effort loading of the airspace text files.
//!
//! The US dataset lives on local disk, the Canadian one is fetched over HTTP.
//! A failure on either side is logged and that source is left out of the
//! result; loading as a whole never fails.

use std::path::{Path, PathBuf};

use log::{error, info};
use thiserror::Error;

use crate::model::{AirspaceFile, AirspaceSource, SourceSelector};

/// Default location of the US airspace file, relative to the working directory.
pub const DEFAULT_US_AIRSPACE_PATH: &str = "data/us_airspace.txt";

/// Default URL of the Canadian airspace file.
pub const DEFAULT_CA_AIRSPACE_URL: &str = "https://soaringweb.org/Airspace/NA/CanadaAirspace.txt";

/// Errors that can occur while loading a single airspace source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Where the two datasets come from.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Local path of the US airspace file.
    pub us_path: PathBuf,
    /// Remote URL of the Canadian airspace file.
    pub ca_url: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            us_path: PathBuf::from(DEFAULT_US_AIRSPACE_PATH),
            ca_url: DEFAULT_CA_AIRSPACE_URL.to_string(),
        }
    }
}

/// Loads airspace files for a [`SourceSelector`].
#[derive(Debug, Clone)]
pub struct AirspaceLoader {
    config: LoaderConfig,
    http: reqwest::Client,
}

impl AirspaceLoader {
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a loader that shares an existing HTTP client.
    #[must_use]
    pub fn with_client(config: LoaderConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Load every source the selector includes, omitting the ones that fail.
    ///
    /// With [`SourceSelector::All`] both sources are loaded concurrently and
    /// the US entry (when present) comes first.
    pub async fn load(&self, selector: SourceSelector) -> Vec<AirspaceFile> {
        let us = async {
            if selector.includes(AirspaceSource::Us) {
                Some(self.load_us().await)
            } else {
                None
            }
        };
        let ca = async {
            if selector.includes(AirspaceSource::Ca) {
                Some(self.load_ca().await)
            } else {
                None
            }
        };

        let (us, ca) = tokio::join!(us, ca);

        let mut files = Vec::with_capacity(2);
        for (source, result) in [(AirspaceSource::Us, us), (AirspaceSource::Ca, ca)] {
            match result {
                Some(Ok(file)) => {
                    info!("Loaded {} airspace file '{}' ({} bytes)", source, file.name, file.content.len());
                    files.push(file);
                }
                Some(Err(e)) => error!("Skipping {} airspace data: {}", source, e),
                None => {}
            }
        }

        files
    }

    /// Read the US airspace file from local disk.
    pub async fn load_us(&self) -> Result<AirspaceFile, LoadError> {
        let path = &self.config.us_path;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?;

        Ok(AirspaceFile {
            content,
            source: AirspaceSource::Us,
            name: name_from_path(path).unwrap_or_else(|| AirspaceSource::Us.to_string()),
        })
    }

    /// Fetch the Canadian airspace file.
    pub async fn load_ca(&self) -> Result<AirspaceFile, LoadError> {
        let url = &self.config.ca_url;
        let fetch_error = |source| LoadError::Fetch {
            url: url.clone(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(fetch_error)?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                url: url.clone(),
                status: response.status().as_u16(),
            });
        }

        let content = response.text().await.map_err(fetch_error)?;

        Ok(AirspaceFile {
            content,
            source: AirspaceSource::Ca,
            name: name_from_url(url).unwrap_or_else(|| AirspaceSource::Ca.to_string()),
        })
    }
}

fn name_from_path(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn name_from_url(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next()?;
    let (_, path) = without_query.split_once("://")?;
    let (_, path) = path.split_once('/')?;
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}
