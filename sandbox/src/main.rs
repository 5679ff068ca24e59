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

// PollScope Sandbox
// Replays a synthetic pointing device through the engine.
//
// Usage: sandbox [--realtime] [config.json]

use anyhow::Result;
use pollscope_sdk::prelude::*;
use std::time::Duration;

/// A simulated device moving in a circle at a fixed report rate.
struct SyntheticDevice {
    rate_hz: f64,
    next_report_ms: f64,
    angle: f64,
}

impl SyntheticDevice {
    fn new(rate_hz: f64, start_ms: f64) -> Self {
        Self {
            rate_hz,
            next_report_ms: start_ms,
            angle: 0.0,
        }
    }

    /// Every report due at or before `now_ms`.
    fn reports(&mut self, now_ms: f64) -> Vec<PointerMove> {
        let period_ms = 1000.0 / self.rate_hz;
        let mut moves = Vec::new();
        while self.next_report_ms <= now_ms {
            self.angle += 0.05;
            moves.push(PointerMove::new(
                400.0 + 200.0 * self.angle.cos(),
                300.0 + 200.0 * self.angle.sin(),
                self.next_report_ms,
            ));
            self.next_report_ms += period_ms;
        }
        moves
    }
}

/// Drives the engine for `duration_ms`, calling `wait` between iterations.
fn run_tracking<C: Clock>(
    scope: &mut PollScope<C>,
    device: &mut SyntheticDevice,
    duration_ms: f64,
    mut wait: impl FnMut(),
) {
    let start = scope.now_ms();
    scope.start_tracking();
    while scope.now_ms() - start < duration_ms {
        wait();
        let now = scope.now_ms();
        for event in device.reports(now) {
            scope.on_pointer_move(event);
        }
        scope.on_frame();
        scope.pump();
        for event in scope.drain_events() {
            match event {
                PollScopeEvent::Estimate(estimate) => log::debug!(
                    "{} Hz ({} samples, {})",
                    estimate.hz,
                    estimate.sample_count,
                    estimate.quality
                ),
                PollScopeEvent::FrameMetrics(metrics) => match metrics.memory {
                    Some(memory) => log::info!("{} fps, {:.1} MB", metrics.fps, memory.used_mb()),
                    None => log::info!("{} fps", metrics.fps),
                },
                PollScopeEvent::PerformanceWarning(true) => {
                    log::warn!("Host too slow for accurate results")
                }
                other => log::debug!("{other:?}"),
            }
        }
    }
    scope.stop_tracking();
}

fn report<C: Clock>(scope: &PollScope<C>) {
    let history = scope.history();
    log::info!(
        "{} estimates: current {} Hz, average {} Hz, max {} Hz",
        history.len(),
        history.current(),
        history.average(),
        history.max()
    );
    if let Some(rating) = scope.rating() {
        log::info!("Rating: {}", rating.message());
    }
    for item in scope.analysis() {
        log::info!("[{:?}] {}", item.kind, item.message);
    }
    match scope.save_result("sandbox", "1970-01-01T00:00:00Z") {
        Ok(entry) => log::info!("Leaderboard entry: {entry:?}"),
        Err(err) => log::warn!("Session not saved: {err}"),
    }
}

fn diagnose<C: Clock>(scope: &mut PollScope<C>, mut wait: impl FnMut()) {
    scope.run_diagnostics();
    let mut last_click = scope.now_ms();
    let mut last_move = last_click;
    while scope.diagnostic_phase().is_active() {
        wait();
        let now = scope.now_ms();
        // A click every 200 ms reported 4 ms before it is observed.
        if now - last_click >= 200.0 {
            scope.on_click(ClickEvent::new(now, now - 4.0));
            last_click = now;
        }
        if now - last_move >= 4.0 {
            scope.on_pointer_move(PointerMove::new(now, now, now));
            last_move = now;
        }
        scope.pump();
    }
    match scope.last_diagnostic_result() {
        Some(result) => {
            let ratings = DiagnosticRatings::from(&result);
            log::info!(
                "Input lag {:.1} ms ({:?}), debounce {:.1} ms ({:?}), stability {}% ({:?})",
                result.input_lag_ms,
                ratings.input_lag,
                result.debounce_delay_ms,
                ratings.debounce,
                result.stability_pct,
                ratings.stability
            );
        }
        None => log::warn!("Diagnostics produced no result"),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let realtime = args.iter().any(|arg| arg == "--realtime");
    let config_path = args.iter().find(|arg| !arg.starts_with("--"));

    if realtime {
        let clock = MonotonicClock::new();
        let mut scope = match config_path {
            Some(path) => PollScope::from_config_file(clock, path)?,
            None => PollScope::new(clock, PollScopeConfig::default()),
        }
        .with_memory_probe(Box::new(SysinfoMemoryProbe::new()));

        let mut device = SyntheticDevice::new(1000.0, scope.now_ms());
        log::info!("Replaying a 1000 Hz device in real time");
        run_tracking(&mut scope, &mut device, 3000.0, || {
            std::thread::sleep(Duration::from_millis(1))
        });
        report(&scope);
        diagnose(&mut scope, || std::thread::sleep(Duration::from_millis(1)));
    } else {
        let clock = ManualClock::new(0.0);
        let mut scope = match config_path {
            Some(path) => PollScope::from_config_file(clock.clone(), path)?,
            None => PollScope::new(clock.clone(), PollScopeConfig::default()),
        };

        let mut device = SyntheticDevice::new(1000.0, 0.0);
        log::info!("Replaying a 1000 Hz device on a simulated clock");
        run_tracking(&mut scope, &mut device, 3000.0, || clock.advance(1.0));
        report(&scope);
        diagnose(&mut scope, || clock.advance(1.0));
    }

    Ok(())
}
