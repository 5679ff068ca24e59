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

//! The PollScope engine facade.

use crate::leaderboard::{normalize_username, LeaderboardEntry, SaveError};
use anyhow::{Context, Result};
use pollscope_agents::{DiagnosticSession, TrackingSession};
use pollscope_core::{
    ClickEvent, Clock, DiagnosticPhase, DiagnosticResult, EventBus, MemoryProbe, PointerMove,
    PollScopeConfig, PollScopeEvent, ScheduledTask, Scheduler, SessionValidator, TaskHandle,
};
use pollscope_infra::CooperativeScheduler;
use pollscope_telemetry::{analyze_history, AnalysisItem, RateHistory, RateRating};

/// A complete measurement engine driven by the host.
///
/// The host forwards input with [`PollScope::on_pointer_move`] and
/// [`PollScope::on_click`], calls [`PollScope::on_frame`] once per display
/// frame and [`PollScope::pump`] often enough to fire timers (at least every
/// few milliseconds while tracking). Everything the engine reports is
/// published on its event bus.
///
/// Tracking and diagnostics are mutually exclusive: starting one stops the
/// other.
pub struct PollScope<C: Clock> {
    clock: C,
    config: PollScopeConfig,
    scheduler: CooperativeScheduler<ScheduledTask>,
    tracking: TrackingSession,
    diagnostics: DiagnosticSession,
    history: RateHistory,
    last_result: Option<DiagnosticResult>,
    bus: EventBus<PollScopeEvent>,
}

impl<C: Clock> PollScope<C> {
    /// Creates an idle engine.
    pub fn new(clock: C, config: PollScopeConfig) -> Self {
        Self {
            clock,
            config,
            scheduler: CooperativeScheduler::new(),
            tracking: TrackingSession::new(config.estimator, config.monitor),
            diagnostics: DiagnosticSession::new(config.diagnostics),
            history: RateHistory::new(),
            last_result: None,
            bus: EventBus::new(),
        }
    }

    /// Creates an idle engine configured from a JSON file.
    pub fn from_config_file(clock: C, path: &str) -> Result<Self> {
        let config = PollScopeConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{path}'"))?;
        log::info!("Loaded configuration from '{path}'");
        Ok(Self::new(clock, config))
    }

    /// Includes memory figures from `probe` in frame metrics.
    pub fn with_memory_probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.tracking = self.tracking.with_probe(probe);
        self
    }

    /// Current time of the engine's clock, in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// The configuration the engine runs with.
    pub fn config(&self) -> &PollScopeConfig {
        &self.config
    }

    /// The event bus everything is published on.
    pub fn events(&self) -> &EventBus<PollScopeEvent> {
        &self.bus
    }

    /// Removes and returns every queued event.
    pub fn drain_events(&self) -> Vec<PollScopeEvent> {
        self.bus.drain()
    }

    // --- Tracking ---

    /// Starts live tracking with an empty history, stopping diagnostics.
    pub fn start_tracking(&mut self) {
        let now = self.clock.now_ms();
        if self.diagnostics.is_running() {
            let events = self.diagnostics.abort(&mut self.scheduler);
            self.publish_all(events);
        }
        self.history.clear();
        let events = self.tracking.start(&mut self.scheduler, now);
        self.publish_all(events);
    }

    /// Stops live tracking. The history is kept for saving and analysis.
    pub fn stop_tracking(&mut self) {
        let events = self.tracking.stop(&mut self.scheduler);
        self.publish_all(events);
    }

    /// Returns `true` while tracking is running.
    pub fn is_tracking(&self) -> bool {
        self.tracking.is_active()
    }

    // --- Host input ---

    /// Forwards a pointer move to whichever session is running.
    pub fn on_pointer_move(&mut self, event: PointerMove) {
        self.tracking.on_pointer_move(event);
        self.diagnostics.on_pointer_move(event.timestamp_ms);
    }

    /// Forwards a click to the diagnostic session.
    pub fn on_click(&mut self, click: ClickEvent) {
        self.diagnostics.on_click(click);
    }

    /// Runs every frame task. Call once per display frame.
    pub fn on_frame(&mut self) {
        let now = self.clock.now_ms();
        for (handle, task) in self.scheduler.frame_tasks() {
            if self.scheduler.is_pending(handle) {
                self.dispatch(handle, task, now);
            }
        }
    }

    /// Fires every timer due at the current time.
    pub fn pump(&mut self) {
        let now = self.clock.now_ms();
        while let Some((handle, task)) = self.scheduler.pop_due(now) {
            self.dispatch(handle, task, now);
        }
    }

    // --- Diagnostics ---

    /// Starts a diagnostic run, stopping tracking.
    pub fn run_diagnostics(&mut self) {
        let now = self.clock.now_ms();
        let events = self.tracking.stop(&mut self.scheduler);
        self.publish_all(events);
        self.last_result = None;
        let events = self.diagnostics.start(&mut self.scheduler, now);
        self.publish_all(events);
    }

    /// Ends the running diagnostic early and returns its result.
    pub fn finish_diagnostics(&mut self) -> Option<DiagnosticResult> {
        let events = self.diagnostics.finish(&mut self.scheduler);
        self.publish_all(events);
        self.last_result
    }

    /// Cancels the running diagnostic without a result.
    pub fn abort_diagnostics(&mut self) {
        let events = self.diagnostics.abort(&mut self.scheduler);
        self.publish_all(events);
    }

    /// Current diagnostic phase.
    pub fn diagnostic_phase(&self) -> DiagnosticPhase {
        self.diagnostics.phase()
    }

    /// Result of the most recent completed diagnostic run.
    pub fn last_diagnostic_result(&self) -> Option<DiagnosticResult> {
        self.last_result
    }

    // --- Results ---

    /// Every estimate of the current (or last) tracking session.
    pub fn history(&self) -> &RateHistory {
        &self.history
    }

    /// Validates the history; returns the message of the first problem.
    pub fn validate_session(&self) -> Option<String> {
        pollscope_core::validate_session(self.history.points())
    }

    /// Builds a leaderboard entry from the history.
    ///
    /// Nothing is produced unless both the username and the history are valid.
    pub fn save_result(&self, username: &str, date: &str) -> Result<LeaderboardEntry, SaveError> {
        let username = normalize_username(username)?;
        SessionValidator::new().validate(self.history.points())?;
        let entry = LeaderboardEntry {
            username,
            max_rate: self.history.max(),
            average_rate: self.history.average(),
            date: date.to_string(),
            data_points: self.history.len(),
        };
        log::info!(
            "Session saved for {}: max {} Hz, average {} Hz",
            entry.username,
            entry.max_rate,
            entry.average_rate
        );
        Ok(entry)
    }

    /// Observations about the consistency of the history.
    pub fn analysis(&self) -> Vec<AnalysisItem> {
        analyze_history(
            self.history.points(),
            self.history.average(),
            self.history.max(),
        )
    }

    /// Rating of the average rate, once any estimate was recorded.
    pub fn rating(&self) -> Option<RateRating> {
        (!self.history.is_empty()).then(|| RateRating::from_rate(self.history.average()))
    }

    fn dispatch(&mut self, handle: TaskHandle, task: ScheduledTask, now: f64) {
        let events = match task {
            ScheduledTask::DiagnosticPhaseElapsed if self.diagnostics.timer() == Some(handle) => {
                self.diagnostics
                    .handle_phase_elapsed(&mut self.scheduler, now)
            }
            _ if self.tracking.owns(handle) => self.tracking.handle_task(task, now),
            _ => {
                log::warn!("Dropping {task:?} from unowned {handle}");
                return;
            }
        };
        self.publish_all(events);
    }

    fn publish_all(&mut self, events: Vec<PollScopeEvent>) {
        let now = self.clock.now_ms();
        for event in events {
            match &event {
                PollScopeEvent::Estimate(estimate) => self.history.record(estimate, now),
                PollScopeEvent::DiagnosticsCompleted(result) => self.last_result = Some(*result),
                _ => {}
            }
            self.bus.publish(event);
        }
    }
}
