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

//! Output events and the channel that carries them to the host.

/// The flume-backed channel events are published on.
pub mod bus;

pub use self::bus::EventBus;

use crate::diagnostic::{DiagnosticPhase, DiagnosticResult};
use crate::estimate::{MovementQuality, RateEstimate};
use crate::telemetry::FrameMetrics;

/// Everything the measurement core reports to its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum PollScopeEvent {
    /// A sanitized rate estimate from one estimation tick.
    Estimate(RateEstimate),
    /// The movement quality indicator changed.
    QualityChanged(MovementQuality),
    /// Frame metrics for the last reporting interval.
    FrameMetrics(FrameMetrics),
    /// Whether host performance is currently too low for reliable results.
    PerformanceWarning(bool),
    /// A diagnostic session entered a new phase.
    PhaseChanged(DiagnosticPhase),
    /// A diagnostic session produced its report.
    DiagnosticsCompleted(DiagnosticResult),
}
