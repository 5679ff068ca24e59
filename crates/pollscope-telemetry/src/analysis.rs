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

//! Heuristic analysis of a finished rate history.
//!
//! Turns a history into a short list of findings a host can display next to
//! the numbers. Histories shorter than the validation minimum produce no
//! findings at all.

use pollscope_core::stats;
use pollscope_core::validation::MIN_SESSION_POINTS;
use pollscope_core::RatePoint;
use serde::{Deserialize, Serialize};

/// Standard deviation above this fraction of the mean signals fluctuation.
const FLUCTUATION_RATIO: f64 = 0.2;
/// A max-min spread above this fraction of the mean signals large variation.
const RANGE_RATIO: f64 = 0.5;
/// Averages below this are typical of standard office devices.
const STANDARD_DEVICE_CEILING_HZ: f64 = 500.0;
/// Averages in `[500, 900)` are good for gaming.
const GAMING_CEILING_HZ: f64 = 900.0;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    /// Something likely wrong with the device or setup.
    Warning,
    /// Neutral information.
    Info,
    /// Something working as it should.
    Success,
}

/// One finding about a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisItem {
    /// Severity of the finding.
    pub kind: AnalysisKind,
    /// User-facing explanation.
    pub message: String,
}

impl AnalysisItem {
    fn new(kind: AnalysisKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Analyzes `points` given the session's average and maximum rate.
pub fn analyze_history(points: &[RatePoint], average: f64, max: f64) -> Vec<AnalysisItem> {
    if points.len() < MIN_SESSION_POINTS {
        return Vec::new();
    }

    let rates: Vec<f64> = points.iter().map(|p| p.rate).collect();
    let sigma = stats::std_dev(&rates).unwrap_or(0.0);
    let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;
    let mut items = Vec::new();

    if sigma > average * FLUCTUATION_RATIO {
        items.push(AnalysisItem::new(
            AnalysisKind::Warning,
            "Your polling rate shows significant fluctuations. This might indicate interference or connection issues.",
        ));
    } else {
        items.push(AnalysisItem::new(
            AnalysisKind::Success,
            "Your polling rate is stable, indicating a good connection and proper device function.",
        ));
    }

    if average < STANDARD_DEVICE_CEILING_HZ {
        items.push(AnalysisItem::new(
            AnalysisKind::Info,
            format!(
                "Average rate of {}Hz is typical for standard devices. For gaming, consider a device with a higher polling rate.",
                average.round()
            ),
        ));
    } else if average < GAMING_CEILING_HZ {
        items.push(AnalysisItem::new(
            AnalysisKind::Success,
            format!(
                "Your average rate of {}Hz is good for gaming and most applications.",
                average.round()
            ),
        ));
    }

    if range > average * RANGE_RATIO {
        items.push(AnalysisItem::new(
            AnalysisKind::Warning,
            format!(
                "Large variation in polling rate ({}Hz range). Try testing on different USB ports or surfaces.",
                range.round()
            ),
        ));
    }

    log::debug!("History analysis produced {} findings", items.len());
    items
}
