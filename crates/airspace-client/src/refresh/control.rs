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

use chrono::{DateTime, Utc};
use log::debug;

/// Whether a refresh request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    Refreshing,
}

/// What the refresh button should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus<'a> {
    /// Never refreshed in this session.
    Idle,
    /// Request in flight.
    Refreshing,
    /// Last attempt succeeded at the given time.
    Succeeded { at: DateTime<Utc> },
    /// Last attempt failed.
    Failed { message: &'a str },
}

/// State behind the refresh button.
///
/// The only re-entry protection is the in-flight guard: a request already
/// running is never cancelled, further clicks are simply ignored.
#[derive(Debug, Clone, Default)]
pub struct RefreshControl {
    phase: RefreshPhase,
    last_refresh: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl RefreshControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click. Returns `true` if the caller should issue the request.
    ///
    /// Nothing happens when the caller has disabled the control or a refresh
    /// is already running.
    pub fn try_begin(&mut self, disabled: bool) -> bool {
        if disabled || self.is_refreshing() {
            debug!("Ignoring refresh click (disabled: {}, phase: {:?})", disabled, self.phase);
            return false;
        }

        self.phase = RefreshPhase::Refreshing;
        true
    }

    /// Record the outcome of the in-flight request.
    ///
    /// Success stamps `now` and clears any previous error; failure keeps the
    /// previous timestamp.
    pub fn finish(&mut self, outcome: Result<(), String>, now: DateTime<Utc>) {
        self.phase = RefreshPhase::Idle;

        match outcome {
            Ok(()) => {
                self.last_refresh = Some(now);
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
    }

    #[must_use]
    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.phase == RefreshPhase::Refreshing
    }

    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Display status: in-flight wins, then the last error, then the last success.
    #[must_use]
    pub fn status(&self) -> RefreshStatus<'_> {
        if self.is_refreshing() {
            return RefreshStatus::Refreshing;
        }

        match (&self.error, self.last_refresh) {
            (Some(message), _) => RefreshStatus::Failed { message },
            (None, Some(at)) => RefreshStatus::Succeeded { at },
            (None, None) => RefreshStatus::Idle,
        }
    }
}
