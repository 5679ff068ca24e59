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

//! # PollScope Core
//!
//! Foundational crate containing the measurement data model, the pure
//! statistics used by every estimator, and the interface contracts (clock,
//! scheduler, memory probe, events) that the rest of the workspace plugs into.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod diagnostic;
pub mod estimate;
pub mod event;
pub mod sample;
pub mod sanitize;
pub mod scheduler;
pub mod stats;
pub mod telemetry;
pub mod utils;
pub mod validation;

pub use clock::Clock;
pub use config::{ConfigError, DiagnosticConfig, EstimatorConfig, MonitorConfig, PollScopeConfig};
pub use diagnostic::{DiagnosticPhase, DiagnosticResult};
pub use estimate::{MovementQuality, RateEstimate};
pub use event::{EventBus, PollScopeEvent};
pub use sample::{ClickEvent, MovementSample, PointerMove, RatePoint};
pub use sanitize::{sanitize_rate, RateSanitizer, SanitizedRate, CANONICAL_RATES};
pub use scheduler::{ScheduledTask, Scheduler, TaskHandle, TaskKind};
pub use telemetry::{FrameMetrics, MemoryProbe, MemorySnapshot};
pub use validation::{validate_session, SessionValidator, ValidationError};
