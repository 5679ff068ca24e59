// Copyright 2025 eraflo
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

//! Tunable parameters for the estimator, frame monitor and diagnostics.
//!
//! Defaults carry the standard measurement constants. Every section is
//! `#[serde(default)]`, so a configuration file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parameters of the sliding-window rate estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Trailing span of samples kept for each evaluation, in milliseconds.
    pub sample_window_ms: f64,
    /// Minimum samples in the window before a rate is computed.
    pub min_samples: usize,
    /// Cadence of estimation ticks, in milliseconds.
    pub update_interval_ms: f64,
    /// Minimum displacement for a movement to count, in pixel-equivalent units.
    pub min_movement_threshold: f64,
    /// Quality is `Good` when strictly more deltas than this were computed.
    pub good_quality_min_deltas: usize,
    /// Lowest median rate that is emitted, in Hz.
    pub min_median_rate: f64,
    /// Highest median rate that is emitted, in Hz.
    pub max_median_rate: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            sample_window_ms: 100.0,
            min_samples: 5,
            update_interval_ms: 16.0,
            min_movement_threshold: 1.0,
            good_quality_min_deltas: 10,
            min_median_rate: 60.0,
            max_median_rate: 4000.0,
        }
    }
}

/// Parameters of the frame-rate monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Reporting interval, in milliseconds.
    pub interval_ms: f64,
    /// Reports whose elapsed time exceeds `interval_ms * stale_factor` are dropped.
    pub stale_factor: f64,
    /// Frame rates below this raise a performance warning.
    pub low_fps_threshold: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000.0,
            stale_factor: 1.5,
            low_fps_threshold: 30,
        }
    }
}

/// Parameters of the diagnostic session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticConfig {
    /// Duration of each measurement phase, in milliseconds.
    pub phase_duration_ms: f64,
    /// Clicks closer than or equal to this are bounces of the same press.
    pub debounce_threshold_ms: f64,
    /// Number of leading clicks used for the lag average.
    pub lag_sample_limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            phase_duration_ms: 3000.0,
            debounce_threshold_ms: 5.0,
            lag_sample_limit: 10,
        }
    }
}

/// Failure to load or save a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The contents are not a valid configuration.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Complete configuration of a PollScope engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollScopeConfig {
    /// Sliding-window estimator settings.
    pub estimator: EstimatorConfig,
    /// Frame-rate monitor settings.
    pub monitor: MonitorConfig,
    /// Diagnostic session settings.
    pub diagnostics: DiagnosticConfig,
}

impl PollScopeConfig {
    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a JSON configuration file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&content)?)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
