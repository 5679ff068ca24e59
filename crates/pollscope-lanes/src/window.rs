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

//! The time-bounded buffer of accepted movement samples.

use pollscope_core::MovementSample;
use std::collections::VecDeque;

/// An arrival-ordered sequence of samples bounded by eviction time.
///
/// After [`SampleWindow::evict_before`] every retained sample has a timestamp
/// greater than or equal to the cutoff.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: VecDeque<MovementSample>,
}

impl SampleWindow {
    /// Creates an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a newly accepted sample.
    pub fn push(&mut self, sample: MovementSample) {
        self.samples.push_back(sample);
    }

    /// Drops every sample with `timestamp < cutoff_ms`, returning how many went.
    ///
    /// Samples are filtered individually rather than popped from the front so a
    /// host delivering slightly out-of-order timestamps cannot leave stale
    /// entries behind a fresh one.
    pub fn evict_before(&mut self, cutoff_ms: f64) -> usize {
        let before = self.samples.len();
        self.samples.retain(|s| s.timestamp_ms >= cutoff_ms);
        before - self.samples.len()
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples are held.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates samples in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &MovementSample> + '_ {
        self.samples.iter()
    }

    /// Iterates sample timestamps in arrival order.
    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.timestamp_ms)
    }

    /// Timestamp of the oldest retained sample.
    pub fn oldest_timestamp(&self) -> Option<f64> {
        self.samples.front().map(|s| s.timestamp_ms)
    }

    /// Discards every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
