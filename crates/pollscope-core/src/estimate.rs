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

//! The rate estimate emitted by the continuous estimator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse indicator of whether enough movement exists to trust an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementQuality {
    /// No measurement is running, or nothing has been evaluated yet.
    #[default]
    None,
    /// Too few samples or deltas in the window.
    Slow,
    /// More than enough deltas to trust the median.
    Good,
}

impl fmt::Display for MovementQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementQuality::None => write!(f, "none"),
            MovementQuality::Slow => write!(f, "slow"),
            MovementQuality::Good => write!(f, "good"),
        }
    }
}

/// A sanitized rate estimate produced by one estimation tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    /// The sanitized event rate, in Hz.
    pub hz: f64,
    /// The number of samples in the window when the estimate was computed.
    pub sample_count: usize,
    /// Movement quality observed on the same tick.
    pub quality: MovementQuality,
}

impl RateEstimate {
    /// Creates a new estimate.
    pub fn new(hz: f64, sample_count: usize, quality: MovementQuality) -> Self {
        Self {
            hz,
            sample_count,
            quality,
        }
    }
}
