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

//! Sliding-window rate estimation.
//!
//! Each tick evicts samples older than the window, turns the inter-arrival
//! deltas of what remains into instantaneous rates, and takes their median.
//! Event rates are bursty, and a single double-fired event would drag a mean
//! far off while barely moving the median.
//!
//! Ordering within a tick is fixed: eviction, then rate computation, then
//! sanitization. Nothing leaves this module unsanitized.

use crate::window::SampleWindow;
use pollscope_core::stats::{positive_deltas, upper_median};
use pollscope_core::{
    EstimatorConfig, MovementQuality, MovementSample, RateEstimate, RateSanitizer,
};

/// What one evaluated tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Movement quality observed on this tick.
    pub quality: MovementQuality,
    /// The sanitized estimate, if one survived every gate.
    pub estimate: Option<RateEstimate>,
    /// Median instantaneous rate before range gating and sanitization.
    pub raw_median_hz: Option<f64>,
    /// Samples evicted from the window on this tick.
    pub evicted: usize,
    /// Samples remaining in the window after eviction.
    pub window_len: usize,
}

/// Owns the sample window and evaluates it at a throttled cadence.
#[derive(Debug, Clone)]
pub struct SlidingWindowEstimator {
    config: EstimatorConfig,
    sanitizer: RateSanitizer,
    window: SampleWindow,
    last_evaluation_ms: Option<f64>,
    quality: MovementQuality,
}

impl SlidingWindowEstimator {
    /// Creates an estimator with an empty window.
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            sanitizer: RateSanitizer::new(),
            window: SampleWindow::new(),
            last_evaluation_ms: None,
            quality: MovementQuality::None,
        }
    }

    /// Adds an accepted sample to the window.
    pub fn push(&mut self, sample: MovementSample) {
        self.window.push(sample);
    }

    /// Evaluates the window at `now_ms`.
    ///
    /// Returns `None` if less than one update interval has passed since the
    /// previous evaluation.
    pub fn tick(&mut self, now_ms: f64) -> Option<TickOutcome> {
        if let Some(last) = self.last_evaluation_ms {
            if now_ms - last < self.config.update_interval_ms {
                log::trace!("Estimation tick throttled at {now_ms:.2} ms");
                return None;
            }
        }
        self.last_evaluation_ms = Some(now_ms);
        Some(self.evaluate(now_ms))
    }

    fn evaluate(&mut self, now_ms: f64) -> TickOutcome {
        let evicted = self
            .window
            .evict_before(now_ms - self.config.sample_window_ms);
        let window_len = self.window.len();

        if window_len < self.config.min_samples {
            self.quality = MovementQuality::Slow;
            return TickOutcome {
                quality: self.quality,
                estimate: None,
                raw_median_hz: None,
                evicted,
                window_len,
            };
        }

        let mut rates: Vec<f64> = positive_deltas(self.window.timestamps())
            .into_iter()
            .map(|delta| 1000.0 / delta)
            .collect();
        rates.sort_by(f64::total_cmp);

        self.quality = if rates.len() > self.config.good_quality_min_deltas {
            MovementQuality::Good
        } else {
            MovementQuality::Slow
        };

        let raw_median_hz = upper_median(&rates);
        let estimate = raw_median_hz
            .filter(|median| {
                (self.config.min_median_rate..=self.config.max_median_rate).contains(median)
            })
            .and_then(|median| self.sanitizer.sanitize(median).hz())
            .map(|hz| RateEstimate::new(hz, window_len, self.quality));

        log::trace!(
            "Tick at {now_ms:.2} ms: {window_len} samples, {} rates, median {raw_median_hz:?}, quality {}",
            rates.len(),
            self.quality
        );

        TickOutcome {
            quality: self.quality,
            estimate,
            raw_median_hz,
            evicted,
            window_len,
        }
    }

    /// Quality reported by the most recent evaluation.
    pub fn quality(&self) -> MovementQuality {
        self.quality
    }

    /// Read access to the sample window.
    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// The configuration this estimator runs with.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Discards every sample and returns to the unevaluated state.
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_evaluation_ms = None;
        self.quality = MovementQuality::None;
    }
}

impl Default for SlidingWindowEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}
