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

//! Acceptance gate for an accumulated rate history.
//!
//! A history must pass [`SessionValidator::validate`] before it is handed to
//! any collaborator that stores or ranks results.

use crate::sample::RatePoint;
use crate::sanitize::{MAX_PLAUSIBLE_RATE, MIN_PLAUSIBLE_RATE};
use crate::stats;
use thiserror::Error;

/// Minimum number of points a history needs to be accepted.
pub const MIN_SESSION_POINTS: usize = 10;

/// Reasons a rate history is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A point carries a non-finite rate or timestamp.
    #[error("Invalid data format")]
    InvalidFormat,
    /// The history holds no points at all.
    #[error("No data to save")]
    Empty,
    /// The history is shorter than [`MIN_SESSION_POINTS`].
    #[error("Not enough data points for accurate results")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
        /// Number of points required.
        required: usize,
    },
    /// The mean rate lies outside the plausible device range.
    #[error("Invalid polling rate values detected")]
    ImplausibleMean {
        /// The offending mean rate, in Hz.
        mean: f64,
    },
}

/// Validates rate histories against minimum size and plausibility bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionValidator {
    min_points: usize,
    min_mean_rate: f64,
    max_mean_rate: f64,
}

impl SessionValidator {
    /// Creates a validator with the standard thresholds.
    pub fn new() -> Self {
        Self {
            min_points: MIN_SESSION_POINTS,
            min_mean_rate: MIN_PLAUSIBLE_RATE,
            max_mean_rate: MAX_PLAUSIBLE_RATE,
        }
    }

    /// Checks `points`, returning the first rule it breaks.
    pub fn validate(&self, points: &[RatePoint]) -> Result<(), ValidationError> {
        if points
            .iter()
            .any(|p| !p.rate.is_finite() || !p.timestamp_ms.is_finite())
        {
            return Err(ValidationError::InvalidFormat);
        }
        if points.is_empty() {
            return Err(ValidationError::Empty);
        }
        if points.len() < self.min_points {
            return Err(ValidationError::TooFewPoints {
                count: points.len(),
                required: self.min_points,
            });
        }

        let rates: Vec<f64> = points.iter().map(|p| p.rate).collect();
        let mean = stats::mean(&rates).unwrap_or(0.0);
        if mean < self.min_mean_rate || mean > self.max_mean_rate {
            log::debug!("Rejecting session with mean rate {mean:.1} Hz");
            return Err(ValidationError::ImplausibleMean { mean });
        }
        Ok(())
    }
}

impl Default for SessionValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates `points`, returning a user-facing message on failure.
pub fn validate_session(points: &[RatePoint]) -> Option<String> {
    SessionValidator::new()
        .validate(points)
        .err()
        .map(|e| e.to_string())
}
