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

//! Coarse ratings of measured rates and diagnostic reports.

use pollscope_core::DiagnosticResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict on an average event rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateRating {
    /// 1000 Hz and above.
    Excellent,
    /// 500 Hz up to 1000 Hz.
    Good,
    /// Below 500 Hz.
    NeedsUpgrade,
}

impl RateRating {
    /// Rates an average rate in Hz.
    pub fn from_rate(rate_hz: f64) -> Self {
        if rate_hz >= 1000.0 {
            RateRating::Excellent
        } else if rate_hz >= 500.0 {
            RateRating::Good
        } else {
            RateRating::NeedsUpgrade
        }
    }

    /// A short user-facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            RateRating::Excellent => "Excellent! Your device is performing at top speed.",
            RateRating::Good => "Good. Your device is responsive.",
            RateRating::NeedsUpgrade => "Consider upgrading for better performance.",
        }
    }
}

impl fmt::Display for RateRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Three-level verdict on one diagnostic figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    /// Within the comfortable range.
    Good,
    /// Noticeable but acceptable.
    Medium,
    /// Likely to affect use.
    Poor,
}

impl Rating {
    /// Rates a delay where lower is better: `< 10 ms` good, `< 20 ms` medium.
    pub fn for_delay_ms(delay_ms: f64) -> Self {
        if delay_ms < 10.0 {
            Rating::Good
        } else if delay_ms < 20.0 {
            Rating::Medium
        } else {
            Rating::Poor
        }
    }

    /// Rates a stability percentage: `> 90` good, `> 75` medium.
    pub fn for_stability_pct(pct: f64) -> Self {
        if pct > 90.0 {
            Rating::Good
        } else if pct > 75.0 {
            Rating::Medium
        } else {
            Rating::Poor
        }
    }
}

/// Ratings for each figure of a [`DiagnosticResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRatings {
    /// Verdict on the input lag.
    pub input_lag: Rating,
    /// Verdict on the debounce delay.
    pub debounce: Rating,
    /// Verdict on movement stability.
    pub stability: Rating,
}

impl From<&DiagnosticResult> for DiagnosticRatings {
    fn from(result: &DiagnosticResult) -> Self {
        Self {
            input_lag: Rating::for_delay_ms(result.input_lag_ms),
            debounce: Rating::for_delay_ms(result.debounce_delay_ms),
            stability: Rating::for_stability_pct(result.stability_pct),
        }
    }
}
