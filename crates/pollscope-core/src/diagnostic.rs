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

//! Types shared by the diagnostic state machine and its consumers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The phase a diagnostic session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiagnosticPhase {
    /// No diagnostic is running.
    #[default]
    Idle,
    /// Measuring the delay between reported and observed clicks.
    Lag,
    /// Measuring the shortest gap between distinct clicks.
    Debounce,
    /// Measuring the regularity of movement intervals.
    Stability,
}

impl DiagnosticPhase {
    /// The phase entered once this one elapses.
    pub fn next(self) -> DiagnosticPhase {
        match self {
            DiagnosticPhase::Idle => DiagnosticPhase::Lag,
            DiagnosticPhase::Lag => DiagnosticPhase::Debounce,
            DiagnosticPhase::Debounce => DiagnosticPhase::Stability,
            DiagnosticPhase::Stability => DiagnosticPhase::Idle,
        }
    }

    /// Returns `true` while a measurement phase is active.
    pub fn is_active(self) -> bool {
        self != DiagnosticPhase::Idle
    }

    /// Progress through the session as a percentage, for progress displays.
    pub fn progress_pct(self) -> u8 {
        match self {
            DiagnosticPhase::Idle => 0,
            DiagnosticPhase::Lag => 33,
            DiagnosticPhase::Debounce => 66,
            DiagnosticPhase::Stability => 100,
        }
    }
}

impl fmt::Display for DiagnosticPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticPhase::Idle => write!(f, "idle"),
            DiagnosticPhase::Lag => write!(f, "lag"),
            DiagnosticPhase::Debounce => write!(f, "debounce"),
            DiagnosticPhase::Stability => write!(f, "stability"),
        }
    }
}

/// The one-shot report produced when a diagnostic session completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    /// Mean input latency over the first lag samples, in milliseconds.
    pub input_lag_ms: f64,
    /// Shortest gap between two distinct clicks, in milliseconds (`0` if none).
    pub debounce_delay_ms: f64,
    /// Movement regularity score, as a rounded percentage in `[0, 100]`.
    pub stability_pct: f64,
    /// Number of movement samples captured during the stability phase.
    pub sample_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_cycle_back_to_idle() {
        let mut phase = DiagnosticPhase::Idle;
        let mut visited = Vec::new();
        for _ in 0..4 {
            phase = phase.next();
            visited.push(phase);
        }
        assert_eq!(
            visited,
            vec![
                DiagnosticPhase::Lag,
                DiagnosticPhase::Debounce,
                DiagnosticPhase::Stability,
                DiagnosticPhase::Idle
            ]
        );
    }

    #[test]
    fn only_idle_is_inactive() {
        assert!(!DiagnosticPhase::Idle.is_active());
        assert!(DiagnosticPhase::Lag.is_active());
        assert_eq!(DiagnosticPhase::Debounce.progress_pct(), 66);
    }
}
