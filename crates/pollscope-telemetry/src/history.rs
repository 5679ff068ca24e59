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

//! Aggregation of the estimates accepted during one tracking session.

use pollscope_core::{RateEstimate, RatePoint};
use serde::{Deserialize, Serialize};

/// Every estimate emitted in a session plus its running aggregates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateHistory {
    points: Vec<RatePoint>,
    sum: f64,
    max: f64,
}

impl RateHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one emitted estimate observed at `timestamp_ms`.
    pub fn record(&mut self, estimate: &RateEstimate, timestamp_ms: f64) {
        self.push(RatePoint::new(estimate.hz, timestamp_ms));
    }

    /// Appends a raw history point.
    pub fn push(&mut self, point: RatePoint) {
        self.sum += point.rate;
        self.max = self.max.max(point.rate);
        self.points.push(point);
    }

    /// The most recent rate, or `0.0` when empty.
    pub fn current(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.rate)
    }

    /// Mean of all rates rounded to the nearest integer, or `0.0` when empty.
    pub fn average(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        (self.sum / self.points.len() as f64).round()
    }

    /// Highest rate seen, or `0.0` when empty.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Lowest rate seen, or `0.0` when empty.
    pub fn min(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.rate)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// All points in emission order.
    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    /// Number of points recorded.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Discards every point and aggregate.
    pub fn clear(&mut self) {
        self.points.clear();
        self.sum = 0.0;
        self.max = 0.0;
    }
}
