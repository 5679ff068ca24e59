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

//! Watchdog over the host's achieved frame-callback throughput.
//!
//! The monitor is fed by two cooperative tasks: a per-frame task calling
//! [`FrameRateMonitor::record_frame`] and a periodic task calling
//! [`FrameRateMonitor::report`]. It is advisory only and never touches the
//! estimator's state.

use pollscope_core::telemetry::MAX_REPORTED_FPS;
use pollscope_core::{FrameMetrics, MemoryProbe, MonitorConfig};

/// Counts frames and turns them into periodic [`FrameMetrics`].
#[derive(Debug)]
pub struct FrameRateMonitor {
    config: MonitorConfig,
    probe: Option<Box<dyn MemoryProbe>>,
    frame_count: u64,
    last_report_ms: f64,
    active: bool,
}

impl FrameRateMonitor {
    /// Creates an inactive monitor without a memory probe.
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            probe: None,
            frame_count: 0,
            last_report_ms: 0.0,
            active: false,
        }
    }

    /// Attaches a memory probe whose figures are included in reports.
    pub fn with_probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Starts counting from `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.frame_count = 0;
        self.last_report_ms = now_ms;
        self.active = true;
        log::debug!("Frame-rate monitor started at {now_ms:.1} ms");
    }

    /// Stops counting; later frames and reports are ignored.
    pub fn stop(&mut self) {
        self.active = false;
        self.frame_count = 0;
    }

    /// Returns `true` between `start` and `stop`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Counts one frame callback.
    pub fn record_frame(&mut self) {
        if self.active {
            self.frame_count += 1;
        }
    }

    /// Frames counted since the last report.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Closes the current reporting interval.
    ///
    /// Returns metrics only when the elapsed time is positive and within
    /// `stale_factor` intervals; a longer gap means the host was suspended and
    /// the count is meaningless. The frame counter restarts either way.
    pub fn report(&mut self, now_ms: f64) -> Option<FrameMetrics> {
        if !self.active {
            return None;
        }

        let elapsed = now_ms - self.last_report_ms;
        let max_elapsed = self.config.interval_ms * self.config.stale_factor;

        let metrics = if elapsed > 0.0 && elapsed <= max_elapsed {
            let fps = (self.frame_count as f64 / elapsed * 1000.0).round();
            let fps = fps.clamp(0.0, f64::from(MAX_REPORTED_FPS)) as u32;
            let memory = self
                .probe
                .as_mut()
                .and_then(|probe| probe.snapshot())
                .filter(|snapshot| snapshot.is_consistent());
            Some(FrameMetrics { fps, memory })
        } else {
            log::debug!("Dropping frame report after {elapsed:.1} ms (limit {max_elapsed:.1} ms)");
            None
        };

        self.frame_count = 0;
        self.last_report_ms = now_ms;
        metrics
    }

    /// Returns `true` if `metrics` indicate degraded measurement conditions.
    pub fn is_low_performance(&self, metrics: &FrameMetrics) -> bool {
        metrics.fps < self.config.low_fps_threshold
    }

    /// The configuration this monitor runs with.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollscope_core::MemorySnapshot;

    #[derive(Debug)]
    struct FixedProbe(Option<MemorySnapshot>);

    impl MemoryProbe for FixedProbe {
        fn snapshot(&mut self) -> Option<MemorySnapshot> {
            self.0
        }
    }

    fn run_frames(monitor: &mut FrameRateMonitor, frames: u32) {
        for _ in 0..frames {
            monitor.record_frame();
        }
    }

    #[test]
    fn sixty_frames_in_one_second() {
        let mut monitor = FrameRateMonitor::default();
        monitor.start(0.0);
        run_frames(&mut monitor, 60);
        let metrics = monitor.report(1000.0).expect("report within interval");
        assert_eq!(metrics.fps, 60);
        assert_eq!(metrics.memory, None);
        assert_eq!(monitor.frame_count(), 0);
    }

    #[test]
    fn fps_is_clamped() {
        let mut monitor = FrameRateMonitor::default();
        monitor.start(0.0);
        run_frames(&mut monitor, 500);
        assert_eq!(monitor.report(1000.0).map(|m| m.fps), Some(144));
    }

    #[test]
    fn stale_interval_is_dropped_and_counter_restarts() {
        let mut monitor = FrameRateMonitor::default();
        monitor.start(0.0);
        run_frames(&mut monitor, 30);
        assert_eq!(monitor.report(1600.0), None);
        assert_eq!(monitor.frame_count(), 0);

        run_frames(&mut monitor, 45);
        assert_eq!(monitor.report(2600.0).map(|m| m.fps), Some(45));
    }

    #[test]
    fn zero_elapsed_is_dropped() {
        let mut monitor = FrameRateMonitor::default();
        monitor.start(500.0);
        run_frames(&mut monitor, 10);
        assert_eq!(monitor.report(500.0), None);
    }

    #[test]
    fn inconsistent_memory_is_omitted() {
        let consistent = MemorySnapshot {
            used_bytes: 1 << 20,
            total_bytes: 1 << 30,
        };
        let mut monitor =
            FrameRateMonitor::default().with_probe(Box::new(FixedProbe(Some(consistent))));
        monitor.start(0.0);
        assert_eq!(
            monitor.report(1000.0).and_then(|m| m.memory),
            Some(consistent)
        );

        let broken = MemorySnapshot {
            used_bytes: 10,
            total_bytes: 5,
        };
        let mut monitor =
            FrameRateMonitor::default().with_probe(Box::new(FixedProbe(Some(broken))));
        monitor.start(0.0);
        let metrics = monitor.report(1000.0).expect("report");
        assert_eq!(metrics.memory, None);
    }

    #[test]
    fn inactive_monitor_ignores_everything() {
        let mut monitor = FrameRateMonitor::default();
        run_frames(&mut monitor, 10);
        assert_eq!(monitor.frame_count(), 0);
        assert_eq!(monitor.report(1000.0), None);

        monitor.start(0.0);
        monitor.stop();
        assert!(!monitor.is_active());
        assert_eq!(monitor.report(1000.0), None);
    }

    #[test]
    fn low_performance_threshold() {
        let monitor = FrameRateMonitor::default();
        assert!(monitor.is_low_performance(&FrameMetrics {
            fps: 29,
            memory: None
        }));
        assert!(!monitor.is_low_performance(&FrameMetrics {
            fps: 30,
            memory: None
        }));
    }
}
