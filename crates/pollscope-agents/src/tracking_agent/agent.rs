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

//! Defines the TrackingSession, which drives live rate estimation.

use pollscope_core::{
    EstimatorConfig, MemoryProbe, MonitorConfig, MovementQuality, PointerMove, PollScopeEvent,
    ScheduledTask, Scheduler, TaskHandle, TaskKind,
};
use pollscope_lanes::{EventSampler, SlidingWindowEstimator};
use pollscope_telemetry::FrameRateMonitor;

/// Handles of the tasks a running tracking session owns.
#[derive(Debug, Clone, Copy)]
struct TrackingTasks {
    estimation: TaskHandle,
    frame: TaskHandle,
    report: TaskHandle,
}

impl TrackingTasks {
    fn all(self) -> [TaskHandle; 3] {
        [self.estimation, self.frame, self.report]
    }
}

/// A live tracking session.
///
/// Pointer moves are filtered by the sampler and pushed into the estimator;
/// every estimation tick may yield a [`PollScopeEvent::Estimate`]. The
/// frame-rate monitor runs for as long as the session does.
#[derive(Debug)]
pub struct TrackingSession {
    sampler: EventSampler,
    estimator: SlidingWindowEstimator,
    monitor: FrameRateMonitor,
    tasks: Option<TrackingTasks>,
    quality: MovementQuality,
    low_performance: bool,
}

impl TrackingSession {
    /// Creates an idle session.
    pub fn new(estimator: EstimatorConfig, monitor: MonitorConfig) -> Self {
        Self {
            sampler: EventSampler::new(estimator.min_movement_threshold),
            estimator: SlidingWindowEstimator::new(estimator),
            monitor: FrameRateMonitor::new(monitor),
            tasks: None,
            quality: MovementQuality::None,
            low_performance: false,
        }
    }

    /// Attaches a memory probe to the frame-rate monitor.
    pub fn with_probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.monitor = self.monitor.with_probe(probe);
        self
    }

    /// Returns `true` while the session's tasks are registered.
    pub fn is_active(&self) -> bool {
        self.tasks.is_some()
    }

    /// Most recent movement quality.
    pub fn quality(&self) -> MovementQuality {
        self.quality
    }

    /// Whether the last frame report indicated degraded performance.
    pub fn is_low_performance(&self) -> bool {
        self.low_performance
    }

    /// Read access to the estimator, mostly for inspection in tests.
    pub fn estimator(&self) -> &SlidingWindowEstimator {
        &self.estimator
    }

    /// Starts the session at `now_ms`, restarting it if it was running.
    ///
    /// Returns the indicator resets of the stopped run, if any.
    pub fn start(
        &mut self,
        scheduler: &mut dyn Scheduler<ScheduledTask>,
        now_ms: f64,
    ) -> Vec<PollScopeEvent> {
        let events = self.stop(scheduler);
        self.reset_state();

        let update_interval_ms = self.estimator.config().update_interval_ms;
        let report_interval_ms = self.monitor.config().interval_ms;

        let estimation = scheduler.schedule(
            TaskKind::Interval {
                period_ms: update_interval_ms,
            },
            now_ms,
            ScheduledTask::EstimationTick,
        );
        let frame = scheduler.schedule(TaskKind::Frame, now_ms, ScheduledTask::FrameSample);
        let report = scheduler.schedule(
            TaskKind::Interval {
                period_ms: report_interval_ms,
            },
            now_ms,
            ScheduledTask::MonitorReport,
        );

        self.monitor.start(now_ms);
        self.tasks = Some(TrackingTasks {
            estimation,
            frame,
            report,
        });
        log::info!("Tracking started at {now_ms:.1} ms");
        events
    }

    /// Stops the session, revoking every task and discarding all samples.
    ///
    /// Returns `QualityChanged(None)` and `PerformanceWarning(false)` for
    /// the indicators that were not already in their idle state.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler<ScheduledTask>) -> Vec<PollScopeEvent> {
        let mut events = Vec::new();
        let Some(tasks) = self.tasks.take() else {
            return events;
        };
        for handle in tasks.all() {
            scheduler.cancel(handle);
        }
        self.monitor.stop();

        if self.quality != MovementQuality::None {
            events.push(PollScopeEvent::QualityChanged(MovementQuality::None));
        }
        if self.low_performance {
            events.push(PollScopeEvent::PerformanceWarning(false));
        }
        self.reset_state();
        log::info!("Tracking stopped");
        events
    }

    /// Feeds one raw pointer move. Ignored while the session is idle.
    pub fn on_pointer_move(&mut self, event: PointerMove) {
        if !self.is_active() {
            return;
        }
        if let Some(sample) = self.sampler.ingest_event(event) {
            self.estimator.push(sample);
        }
    }

    /// Returns `true` if `handle` belongs to this session.
    pub fn owns(&self, handle: TaskHandle) -> bool {
        self.tasks
            .is_some_and(|tasks| tasks.all().contains(&handle))
    }

    /// Runs one fired task and returns the events it produced.
    pub fn handle_task(&mut self, task: ScheduledTask, now_ms: f64) -> Vec<PollScopeEvent> {
        let mut events = Vec::new();
        if !self.is_active() {
            return events;
        }

        match task {
            ScheduledTask::EstimationTick => {
                let Some(outcome) = self.estimator.tick(now_ms) else {
                    return events;
                };
                if outcome.quality != self.quality {
                    log::debug!("Movement quality {} -> {}", self.quality, outcome.quality);
                    self.quality = outcome.quality;
                    events.push(PollScopeEvent::QualityChanged(outcome.quality));
                }
                if let Some(estimate) = outcome.estimate {
                    events.push(PollScopeEvent::Estimate(estimate));
                }
            }
            ScheduledTask::FrameSample => self.monitor.record_frame(),
            ScheduledTask::MonitorReport => {
                if let Some(metrics) = self.monitor.report(now_ms) {
                    let low = self.monitor.is_low_performance(&metrics);
                    events.push(PollScopeEvent::FrameMetrics(metrics));
                    if low != self.low_performance {
                        if low {
                            log::warn!("Low frame rate ({} fps), results may be inaccurate", metrics.fps);
                        }
                        self.low_performance = low;
                        events.push(PollScopeEvent::PerformanceWarning(low));
                    }
                }
            }
            ScheduledTask::DiagnosticPhaseElapsed => {
                log::trace!("Tracking session ignoring {task:?}");
            }
        }
        events
    }

    fn reset_state(&mut self) {
        self.sampler.reset();
        self.estimator.reset();
        self.quality = MovementQuality::None;
        self.low_performance = false;
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new(EstimatorConfig::default(), MonitorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollscope_infra::CooperativeScheduler;

    fn pump(
        session: &mut TrackingSession,
        scheduler: &mut CooperativeScheduler<ScheduledTask>,
        now_ms: f64,
    ) -> Vec<PollScopeEvent> {
        let mut events = Vec::new();
        while let Some((_, task)) = scheduler.pop_due(now_ms) {
            events.extend(session.handle_task(task, now_ms));
        }
        events
    }

    #[test]
    fn start_registers_three_tasks_and_stop_revokes_them() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = TrackingSession::default();
        session.start(&mut scheduler, 0.0);
        assert!(session.is_active());
        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.frame_tasks().len(), 1);

        session.stop(&mut scheduler);
        assert!(!session.is_active());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn steady_stream_emits_estimates() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = TrackingSession::default();
        session.start(&mut scheduler, 0.0);

        let mut estimates = Vec::new();
        for ms in 1..=200 {
            let t = f64::from(ms);
            session.on_pointer_move(PointerMove::new(t * 2.0, 0.0, t));
            for event in pump(&mut session, &mut scheduler, t) {
                if let PollScopeEvent::Estimate(estimate) = event {
                    estimates.push(estimate);
                }
            }
        }

        assert!(!estimates.is_empty());
        assert!(estimates.iter().all(|e| e.hz == 1000.0));
        assert_eq!(session.quality(), MovementQuality::Good);
    }

    #[test]
    fn stop_resets_the_published_indicators() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = TrackingSession::default();
        session.start(&mut scheduler, 0.0);

        for _ in 0..10 {
            session.handle_task(ScheduledTask::FrameSample, 0.0);
        }
        for ms in 1..=1000 {
            let t = f64::from(ms);
            session.on_pointer_move(PointerMove::new(t * 2.0, 0.0, t));
            pump(&mut session, &mut scheduler, t);
        }
        assert_eq!(session.quality(), MovementQuality::Good);
        assert!(session.is_low_performance());

        let events = session.stop(&mut scheduler);
        assert_eq!(
            events,
            vec![
                PollScopeEvent::QualityChanged(MovementQuality::None),
                PollScopeEvent::PerformanceWarning(false)
            ]
        );
        assert_eq!(session.quality(), MovementQuality::None);
        assert!(session.stop(&mut scheduler).is_empty());
    }

    #[test]
    fn restart_reports_the_reset_of_the_previous_run() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = TrackingSession::default();
        assert!(session.start(&mut scheduler, 0.0).is_empty());
        pump(&mut session, &mut scheduler, 16.0);
        assert_eq!(session.quality(), MovementQuality::Slow);

        let events = session.start(&mut scheduler, 20.0);
        assert_eq!(events, vec![PollScopeEvent::QualityChanged(MovementQuality::None)]);
        assert_eq!(scheduler.len(), 3);
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut session = TrackingSession::default();
        session.on_pointer_move(PointerMove::new(0.0, 0.0, 0.0));
        session.on_pointer_move(PointerMove::new(10.0, 0.0, 1.0));
        assert!(session.estimator().window().is_empty());
    }

    #[test]
    fn low_frame_rate_raises_then_clears_the_warning() {
        let mut scheduler = CooperativeScheduler::new();
        let mut session = TrackingSession::default();
        session.start(&mut scheduler, 0.0);

        // 10 frames in the first second.
        for _ in 0..10 {
            session.handle_task(ScheduledTask::FrameSample, 0.0);
        }
        let events = pump(&mut session, &mut scheduler, 1000.0);
        assert!(events.contains(&PollScopeEvent::PerformanceWarning(true)));
        assert!(session.is_low_performance());

        for _ in 0..60 {
            session.handle_task(ScheduledTask::FrameSample, 1000.0);
        }
        let events = pump(&mut session, &mut scheduler, 2000.0);
        assert!(events.contains(&PollScopeEvent::PerformanceWarning(false)));
        assert!(!session.is_low_performance());
    }
}
