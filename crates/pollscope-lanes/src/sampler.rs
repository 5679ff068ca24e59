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

//! Noise filtering of raw pointer movement.

use pollscope_core::{MovementSample, PointerMove};

/// Default minimum displacement for a movement to count.
pub const MIN_MOVEMENT_THRESHOLD: f64 = 1.0;

/// Accepts raw pointer positions and rejects sub-threshold jitter.
///
/// Displacement is always measured from the last *raw* position, stored or
/// not, so a slow drift made of many tiny steps never accumulates into an
/// accepted sample. The first event after a reset only seeds the position.
#[derive(Debug, Clone)]
pub struct EventSampler {
    threshold: f64,
    last_position: Option<(f64, f64)>,
    accepted: u64,
    rejected: u64,
}

impl EventSampler {
    /// Creates a sampler with the given displacement threshold.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_position: None,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Feeds one raw position, returning the sample if it counts as movement.
    pub fn ingest(&mut self, timestamp_ms: f64, x: f64, y: f64) -> Option<MovementSample> {
        let previous = self.last_position.replace((x, y));
        let (px, py) = previous?;

        if (x - px).hypot(y - py) >= self.threshold {
            self.accepted += 1;
            Some(MovementSample::new(timestamp_ms, x, y))
        } else {
            self.rejected += 1;
            None
        }
    }

    /// Convenience wrapper around [`EventSampler::ingest`].
    pub fn ingest_event(&mut self, event: PointerMove) -> Option<MovementSample> {
        self.ingest(event.timestamp_ms, event.x, event.y)
    }

    /// The most recent raw position, stored or not.
    pub fn last_position(&self) -> Option<(f64, f64)> {
        self.last_position
    }

    /// Number of samples accepted since the last reset.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Number of events rejected as jitter since the last reset.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Forgets the last position and clears the counters.
    pub fn reset(&mut self) {
        self.last_position = None;
        self.accepted = 0;
        self.rejected = 0;
    }
}

impl Default for EventSampler {
    fn default() -> Self {
        Self::new(MIN_MOVEMENT_THRESHOLD)
    }
}
