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

//! Server-side airspace data refresh.
//!
//! Two halves:
//! - [`RefreshClient`] posts the regeneration request and, only when the
//!   server reports success, runs a caller-supplied follow-up (the viewer
//!   reloads its airspace files there).
//! - [`RefreshControl`] is the state behind the refresh button: an in-flight
//!   guard, the last successful refresh time and the last error.

mod control;

pub use control::{RefreshControl, RefreshPhase, RefreshStatus};

use std::future::Future;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default update endpoint of the data server.
pub const DEFAULT_UPDATE_ENDPOINT: &str = "http://localhost:3000/api/update-airspace";

/// Message shown when the server reports failure without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to update airspace data";

/// Request body posted to the update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub sources: Vec<String>,
}

/// Response body returned by the update endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Free-form error details; only logged.
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

/// Errors from a refresh request.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The request could not be sent or the reply could not be decoded.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The server answered but reported failure.
    #[error("{0}")]
    Rejected(String),
}

/// HTTP client for the update endpoint.
#[derive(Debug, Clone)]
pub struct RefreshClient {
    endpoint: String,
    http: reqwest::Client,
}

impl RefreshClient {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    #[must_use]
    pub fn with_client(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    /// Ask the server to regenerate the given sources.
    ///
    /// The response body is decoded whatever the HTTP status, since the server
    /// reports failures through `success` and `message`.
    pub async fn request_update(&self, sources: &[String]) -> Result<UpdateResponse, RefreshError> {
        let body = UpdateRequest {
            sources: sources.to_vec(),
        };

        info!("Requesting airspace update for [{}] from {}", sources.join(", "), self.endpoint);

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let reply: UpdateResponse = response.json().await?;

        if !status.is_success() {
            warn!("Update endpoint returned HTTP {}", status);
        }

        Ok(reply)
    }

    /// Request an update and run `on_success` only if the server reports success.
    ///
    /// Returns the follow-up's output on success, or the error string to show
    /// next to the refresh button.
    pub async fn refresh_then<F, Fut, T>(&self, sources: &[String], on_success: F) -> Result<T, String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        match self.request_update(sources).await.and_then(check_reply) {
            Ok(()) => {
                info!("Airspace update succeeded");
                Ok(on_success().await)
            }
            Err(e) => {
                error!("Airspace update failed: {}", e);
                Err(e.to_string())
            }
        }
    }
}

fn check_reply(reply: UpdateResponse) -> Result<(), RefreshError> {
    if reply.success {
        return Ok(());
    }

    if let Some(errors) = &reply.errors {
        warn!("Update endpoint reported errors: {}", errors);
    }

    Err(RefreshError::Rejected(
        reply
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
    ))
}
