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

//! Defines the DiagnosticSession state machine.

use pollscope_core::stats::{positive_deltas, stability_score};
use pollscope_core::{
    ClickEvent, DiagnosticConfig, DiagnosticPhase, DiagnosticResult, PollScopeEvent,
    ScheduledTask, Scheduler, TaskHandle, TaskKind,
};

/// Buffers filled while the session runs.
#[derive(Debug, Default, Clone)]
struct Captures {
    /// `observed - reported` for every click of the lag phase.
    lag_samples: Vec<f64>,
    /// Observed times of the distinct clicks of the debounce phase.
    debounce_clicks: Vec<f64>,
    /// Times of every pointer move of the stability phase.
    move_timestamps: Vec<f64>,
}

/// A three-phase diagnostic run: lag, then debounce, then stability.
///
/// Each phase lasts [`DiagnosticConfig::phase_duration_ms`] and is ended by a
/// one-shot timer firing [`ScheduledTask::DiagnosticPhaseElapsed`]. When the
/// stability phase elapses the session computes its [`DiagnosticResult`] and
/// returns to [`DiagnosticPhase::Idle`].
#[derive(Debug)]
pub struct DiagnosticSession {
    config: DiagnosticConfig,
    phase: DiagnosticPhase,
    timer: Option<TaskHandle>,
    captures: Captures,
}

impl DiagnosticSession {
    /// Creates an idle session.
    pub fn new(config: DiagnosticConfig) -> Self {
        Self {
            config,
            phase: DiagnosticPhase::Idle,
            timer: None,
            captures: Captures::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DiagnosticPhase {
        self.phase
    }

    /// Returns `true` while a phase is running.
    pub fn is_running(&self) -> bool {
        self.phase.is_active()
    }

    /// Handle of the running phase timer, if any.
    pub fn timer(&self) -> Option<TaskHandle> {
        self.timer
    }

    /// Starts a fresh run at `now_ms`, discarding any run in progress.
    pub fn start(
        &mut self,
        scheduler: &mut dyn Scheduler<ScheduledTask>,
        now_ms: f64,
    ) -> Vec<PollScopeEvent> {
        if self.is_running() {
            log::debug!("Restarting diagnostics from the {} phase", self.phase);
            self.cancel_timer(scheduler);
        }
        self.captures = Captures::default();
        log::info!("Diagnostics started at {now_ms:.1} ms");
        self.enter(scheduler, DiagnosticPhase::Lag, now_ms)
    }

    /// Records a click according to the current phase.
    pub fn on_click(&mut self, click: ClickEvent) {
        match self.phase {
            DiagnosticPhase::Lag => self.captures.lag_samples.push(click.latency_ms()),
            DiagnosticPhase::Debounce => {
                let distinct = self
                    .captures
                    .debounce_clicks
                    .last()
                    .is_none_or(|last| click.observed_ms - last > self.config.debounce_threshold_ms);
                if distinct {
                    self.captures.debounce_clicks.push(click.observed_ms);
                } else {
                    log::trace!("Bounce at {:.2} ms ignored", click.observed_ms);
                }
            }
            DiagnosticPhase::Idle | DiagnosticPhase::Stability => {}
        }
    }

    /// Records a pointer move time during the stability phase.
    pub fn on_pointer_move(&mut self, timestamp_ms: f64) {
        if self.phase == DiagnosticPhase::Stability {
            self.captures.move_timestamps.push(timestamp_ms);
        }
    }

    /// Advances to the next phase after the current timer fired.
    ///
    /// Returns the phase-change notification, followed by the completion
    /// event when the stability phase was the one that elapsed.
    pub fn handle_phase_elapsed(
        &mut self,
        scheduler: &mut dyn Scheduler<ScheduledTask>,
        now_ms: f64,
    ) -> Vec<PollScopeEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        // The one-shot timer is gone once it fired.
        self.timer = None;

        match self.phase.next() {
            DiagnosticPhase::Idle => self.complete(scheduler),
            next => self.enter(scheduler, next, now_ms),
        }
    }

    /// Ends a running session early and computes the result from what was
    /// captured so far.
    pub fn finish(&mut self, scheduler: &mut dyn Scheduler<ScheduledTask>) -> Vec<PollScopeEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        log::info!("Diagnostics finished early during the {} phase", self.phase);
        self.complete(scheduler)
    }

    /// Cancels a running session and discards everything it captured.
    pub fn abort(&mut self, scheduler: &mut dyn Scheduler<ScheduledTask>) -> Vec<PollScopeEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        self.cancel_timer(scheduler);
        self.captures = Captures::default();
        self.phase = DiagnosticPhase::Idle;
        log::info!("Diagnostics aborted");
        vec![PollScopeEvent::PhaseChanged(DiagnosticPhase::Idle)]
    }

    /// Computes the report from the current captures without changing state.
    pub fn result(&self) -> DiagnosticResult {
        let lag: Vec<f64> = self
            .captures
            .lag_samples
            .iter()
            .copied()
            .take(self.config.lag_sample_limit)
            .collect();
        let input_lag_ms = pollscope_core::stats::mean(&lag).unwrap_or(0.0);

        // Lag clicks count towards the leading clicks excluded from debounce.
        let skip = self
            .config
            .lag_sample_limit
            .saturating_sub(self.captures.lag_samples.len());
        let debounce_delay_ms = self
            .captures
            .debounce_clicks
            .iter()
            .skip(skip)
            .zip(self.captures.debounce_clicks.iter().skip(skip + 1))
            .map(|(prev, next)| next - prev)
            .filter(|delta| *delta > self.config.debounce_threshold_ms)
            .reduce(f64::min)
            .unwrap_or(0.0);

        let intervals = positive_deltas(self.captures.move_timestamps.iter().copied());
        let stability_pct = (stability_score(&intervals) * 100.0).round();

        DiagnosticResult {
            input_lag_ms,
            debounce_delay_ms,
            stability_pct,
            sample_count: self.captures.move_timestamps.len(),
        }
    }

    fn enter(
        &mut self,
        scheduler: &mut dyn Scheduler<ScheduledTask>,
        phase: DiagnosticPhase,
        now_ms: f64,
    ) -> Vec<PollScopeEvent> {
        self.phase = phase;
        self.timer = Some(scheduler.schedule(
            TaskKind::Timeout {
                delay_ms: self.config.phase_duration_ms,
            },
            now_ms,
            ScheduledTask::DiagnosticPhaseElapsed,
        ));
        log::debug!("Diagnostic phase {phase} ({}%)", phase.progress_pct());
        vec![PollScopeEvent::PhaseChanged(phase)]
    }

    fn complete(&mut self, scheduler: &mut dyn Scheduler<ScheduledTask>) -> Vec<PollScopeEvent> {
        self.cancel_timer(scheduler);
        let result = self.result();
        self.captures = Captures::default();
        self.phase = DiagnosticPhase::Idle;
        log::info!(
            "Diagnostics complete: lag {:.1} ms, debounce {:.1} ms, stability {}% over {} samples",
            result.input_lag_ms,
            result.debounce_delay_ms,
            result.stability_pct,
            result.sample_count
        );
        vec![
            PollScopeEvent::PhaseChanged(DiagnosticPhase::Idle),
            PollScopeEvent::DiagnosticsCompleted(result),
        ]
    }

    fn cancel_timer(&mut self, scheduler: &mut dyn Scheduler<ScheduledTask>) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
    }
}

impl Default for DiagnosticSession {
    fn default() -> Self {
        Self::new(DiagnosticConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pollscope_infra::CooperativeScheduler;

    fn elapse(
        session: &mut DiagnosticSession,
        scheduler: &mut CooperativeScheduler<ScheduledTask>,
        now_ms: f64,
    ) -> Vec<PollScopeEvent> {
        let mut events = Vec::new();
        while let Some((_, task)) = scheduler.pop_due(now_ms) {
            assert_eq!(task, ScheduledTask::DiagnosticPhaseElapsed);
            events.extend(session.handle_phase_elapsed(scheduler, now_ms));
        }
        events
    }

    fn completed(events: &[PollScopeEvent]) -> Option<DiagnosticResult> {
        events.iter().find_map(|event| match event {
            PollScopeEvent::DiagnosticsCompleted(result) => Some(*result),
            _ => None,
        })
    }

    #[test]
    fn phases_advance_on_timer_and_complete_once() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = DiagnosticSession::default();

        let events = session.start(&mut scheduler, 0.0);
        assert_eq!(events, vec![PollScopeEvent::PhaseChanged(DiagnosticPhase::Lag)]);

        assert!(elapse(&mut session, &mut scheduler, 2999.0).is_empty());
        let events = elapse(&mut session, &mut scheduler, 3000.0);
        assert_eq!(events, vec![PollScopeEvent::PhaseChanged(DiagnosticPhase::Debounce)]);

        elapse(&mut session, &mut scheduler, 6000.0);
        assert_eq!(session.phase(), DiagnosticPhase::Stability);

        let events = elapse(&mut session, &mut scheduler, 9000.0);
        assert_eq!(events[0], PollScopeEvent::PhaseChanged(DiagnosticPhase::Idle));
        assert!(completed(&events).is_some());
        assert_eq!(session.phase(), DiagnosticPhase::Idle);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn lag_is_mean_of_first_ten_samples() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = DiagnosticSession::default();
        session.start(&mut scheduler, 0.0);

        for i in 0..10 {
            let reported = f64::from(i) * 100.0;
            session.on_click(ClickEvent::new(reported + 8.0, reported));
        }
        // Later samples do not move the average.
        session.on_click(ClickEvent::new(1050.0, 1000.0));

        let result = completed(&session.finish(&mut scheduler)).expect("result");
        assert_relative_eq!(result.input_lag_ms, 8.0);
        assert_eq!(result.debounce_delay_ms, 0.0);
        assert_eq!(result.sample_count, 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn debounce_ignores_bounces_and_takes_smallest_gap() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = DiagnosticSession::default();
        session.start(&mut scheduler, 0.0);
        for i in 0..10 {
            session.on_click(ClickEvent::new(f64::from(i) * 10.0 + 2.0, f64::from(i) * 10.0));
        }
        elapse(&mut session, &mut scheduler, 3000.0);
        assert_eq!(session.phase(), DiagnosticPhase::Debounce);

        for t in [3100.0, 3102.0, 3180.0, 3240.0, 3243.0, 3400.0] {
            session.on_click(ClickEvent::new(t, t));
        }
        let result = session.result();
        // Recorded: 3100, 3180, 3240, 3400.
        assert_relative_eq!(result.debounce_delay_ms, 60.0);
    }

    #[test]
    fn debounce_skips_leading_clicks_when_lag_phase_was_short() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = DiagnosticSession::default();
        session.start(&mut scheduler, 0.0);
        for _ in 0..8 {
            session.on_click(ClickEvent::new(5.0, 0.0));
        }
        elapse(&mut session, &mut scheduler, 3000.0);

        // The first two debounce clicks make up the ten leading clicks.
        for t in [3010.0, 3020.0, 3100.0, 3300.0] {
            session.on_click(ClickEvent::new(t, t));
        }
        assert_relative_eq!(session.result().debounce_delay_ms, 200.0);
    }

    #[test]
    fn stability_counts_moves_and_scores_regularity() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = DiagnosticSession::default();
        session.start(&mut scheduler, 0.0);
        elapse(&mut session, &mut scheduler, 3000.0);

        // Moves outside the stability phase are not recorded.
        session.on_pointer_move(3001.0);
        elapse(&mut session, &mut scheduler, 6000.0);

        for i in 0..100 {
            session.on_pointer_move(6000.0 + f64::from(i) * 8.0);
        }
        let result = completed(&elapse(&mut session, &mut scheduler, 9000.0)).expect("result");
        assert_eq!(result.sample_count, 100);
        assert_eq!(result.stability_pct, 100.0);
    }

    #[test]
    fn abort_discards_everything() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = DiagnosticSession::default();
        session.start(&mut scheduler, 0.0);
        session.on_click(ClickEvent::new(20.0, 0.0));

        let events = session.abort(&mut scheduler);
        assert_eq!(events, vec![PollScopeEvent::PhaseChanged(DiagnosticPhase::Idle)]);
        assert!(scheduler.is_empty());
        assert_eq!(session.result().input_lag_ms, 0.0);
        assert!(session.finish(&mut scheduler).is_empty());
    }
}
