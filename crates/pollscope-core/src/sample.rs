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

//! Raw input records delivered by the host and the samples derived from them.
//!
//! All timestamps are milliseconds on the host's monotonic clock.

use serde::{Deserialize, Serialize};

/// A raw pointer-movement event as delivered by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMove {
    /// Horizontal position, in pixel-equivalent units.
    pub x: f64,
    /// Vertical position, in pixel-equivalent units.
    pub y: f64,
    /// Time at which the event was observed, in milliseconds.
    pub timestamp_ms: f64,
}

impl PointerMove {
    /// Creates a new pointer-movement event.
    pub fn new(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms }
    }
}

/// A raw click event.
///
/// `observed_ms` is when the core saw the event, `reported_ms` is when the
/// host claims the physical input occurred. Their difference approximates the
/// end-to-end input latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Time at which the click was observed, in milliseconds.
    pub observed_ms: f64,
    /// Time the host reports for the click, in milliseconds.
    pub reported_ms: f64,
}

impl ClickEvent {
    /// Creates a new click event.
    pub fn new(observed_ms: f64, reported_ms: f64) -> Self {
        Self {
            observed_ms,
            reported_ms,
        }
    }

    /// Delay between the reported input time and its observation.
    pub fn latency_ms(&self) -> f64 {
        self.observed_ms - self.reported_ms
    }
}

/// A movement sample accepted into the sampling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSample {
    /// Arrival time, in milliseconds.
    pub timestamp_ms: f64,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl MovementSample {
    /// Creates a new movement sample.
    pub fn new(timestamp_ms: f64, x: f64, y: f64) -> Self {
        Self { timestamp_ms, x, y }
    }

    /// Euclidean distance between this sample's position and `(x, y)`.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

impl From<PointerMove> for MovementSample {
    fn from(event: PointerMove) -> Self {
        Self::new(event.timestamp_ms, event.x, event.y)
    }
}

/// One accepted rate estimate in a session history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Sanitized rate, in Hz.
    pub rate: f64,
    /// When the estimate was emitted, in milliseconds.
    pub timestamp_ms: f64,
}

impl RatePoint {
    /// Creates a new history point.
    pub fn new(rate: f64, timestamp_ms: f64) -> Self {
        Self { rate, timestamp_ms }
    }
}
