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

//! Host performance snapshots and the probe trait that supplies them.
//!
//! "Monitoring" here means polling the host for its state (frame throughput,
//! memory) to decide whether measurement conditions are degraded. None of it
//! feeds back into the rate estimate itself.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Upper bound applied to every reported fps value.
pub const MAX_REPORTED_FPS: u32 = 144;

/// A snapshot of memory usage, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Bytes currently in use.
    pub used_bytes: u64,
    /// Total bytes available.
    pub total_bytes: u64,
}

impl MemorySnapshot {
    /// Returns `true` when the host figures are self-consistent.
    pub fn is_consistent(&self) -> bool {
        self.used_bytes <= self.total_bytes
    }

    /// Bytes in use, in megabytes (MB).
    pub fn used_mb(&self) -> f64 {
        self.used_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Fraction of the total currently in use, in `[0, 1]` when consistent.
    pub fn utilization(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64
    }
}

/// Metrics reported by the frame-rate monitor once per reporting interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameMetrics {
    /// Achieved frame callbacks per second, clamped to `0..=144`.
    pub fps: u32,
    /// Memory usage, when the host exposes a consistent figure.
    pub memory: Option<MemorySnapshot>,
}

/// A source of host memory figures.
///
/// Probes may fail at any time; returning `None` simply omits memory from the
/// next report.
pub trait MemoryProbe: Debug {
    /// Returns a fresh memory snapshot, if the host can provide one.
    fn snapshot(&mut self) -> Option<MemorySnapshot>;
}
