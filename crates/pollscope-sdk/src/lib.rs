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

//! The public-facing SDK for PollScope.
//!
//! [`PollScope`] bundles the scheduler, the tracking and diagnostic agents,
//! the rate history and the event bus behind one object the host drives with
//! input events, frame callbacks and timer pumps.

#![warn(missing_docs)]

mod engine;
pub mod leaderboard;

pub use engine::PollScope;
pub use leaderboard::{Leaderboard, LeaderboardEntry, SaveError};

/// Commonly used types, re-exported for hosts.
pub mod prelude {
    pub use crate::{Leaderboard, LeaderboardEntry, PollScope, SaveError};
    pub use pollscope_core::{
        validate_session, ClickEvent, Clock, DiagnosticPhase, DiagnosticResult, FrameMetrics,
        MovementQuality, PointerMove, PollScopeConfig, PollScopeEvent, RateEstimate, RatePoint,
        ValidationError,
    };
    pub use pollscope_infra::{ManualClock, MonotonicClock, SysinfoMemoryProbe};
    pub use pollscope_telemetry::{
        AnalysisItem, AnalysisKind, DiagnosticRatings, RateHistory, RateRating, Rating,
    };
}
