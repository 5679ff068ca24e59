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

//! Cooperative scheduling contracts.
//!
//! Everything time-driven in the workspace is expressed as a task registered
//! with a [`Scheduler`]: either a per-frame task, fired on every host frame
//! callback until cancelled, or a timer task, fired once after a delay or
//! repeatedly at a fixed period. Every registration returns a [`TaskHandle`]
//! and the owner must revoke it when it stops; there is no hidden recurring
//! registration.

use std::fmt;

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Wraps a raw identifier.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// How a task is triggered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskKind {
    /// Fired on every frame callback until cancelled.
    Frame,
    /// Fired once, `delay_ms` after registration.
    Timeout {
        /// Delay before firing, in milliseconds.
        delay_ms: f64,
    },
    /// Fired every `period_ms` until cancelled.
    Interval {
        /// Period between firings, in milliseconds.
        period_ms: f64,
    },
}

/// The work items the measurement sessions schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduledTask {
    /// Evaluate the sliding window and maybe emit an estimate.
    EstimationTick,
    /// Count one frame for the frame-rate monitor.
    FrameSample,
    /// Compute and publish frame metrics.
    MonitorReport,
    /// The current diagnostic phase has run its full duration.
    DiagnosticPhaseElapsed,
}

/// A cooperative scheduler that owns registrations but never runs work itself.
///
/// The host asks the scheduler which tasks are due and dispatches them to their
/// owners, so no callback ever holds a borrow of session state.
pub trait Scheduler<T> {
    /// Registers `task`, returning the handle that revokes it.
    fn schedule(&mut self, kind: TaskKind, now_ms: f64, task: T) -> TaskHandle;

    /// Revokes a registration. Returns `false` if it was not pending.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    /// Returns `true` if the handle is still registered.
    fn is_pending(&self, handle: TaskHandle) -> bool;
}
