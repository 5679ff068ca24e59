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

use approx::assert_relative_eq;
use pollscope_sdk::prelude::*;
use std::io::Write;

fn engine() -> (ManualClock, PollScope<ManualClock>) {
    let clock = ManualClock::new(0.0);
    let scope = PollScope::new(clock.clone(), PollScopeConfig::default());
    (clock, scope)
}

/// Replays a device moving every `period_ms` for `duration_ms`, pumping and
/// rendering every millisecond.
fn replay_device(clock: &ManualClock, scope: &mut PollScope<ManualClock>, period_ms: u32, duration_ms: u32) {
    for step in 1..=duration_ms {
        clock.advance(1.0);
        let now = clock.now_ms();
        if step % period_ms == 0 {
            scope.on_pointer_move(PointerMove::new(now * 3.0, now, now));
        }
        scope.on_frame();
        scope.pump();
    }
}

fn estimates(events: &[PollScopeEvent]) -> Vec<RateEstimate> {
    events
        .iter()
        .filter_map(|event| match event {
            PollScopeEvent::Estimate(estimate) => Some(*estimate),
            _ => None,
        })
        .collect()
}

#[test]
fn test_500hz_stream_reports_500() {
    let (clock, mut scope) = engine();
    scope.start_tracking();
    replay_device(&clock, &mut scope, 2, 500);

    let estimates = estimates(&scope.drain_events());
    assert!(!estimates.is_empty());
    assert!(estimates.iter().all(|estimate| estimate.hz == 500.0));
    assert_eq!(scope.history().len(), estimates.len());
    assert_eq!(scope.history().average(), 500.0);
    assert_eq!(scope.history().max(), 500.0);
}

#[test]
fn test_1000hz_session_saves_and_rates() {
    let (clock, mut scope) = engine();
    scope.start_tracking();
    replay_device(&clock, &mut scope, 1, 1000);
    scope.stop_tracking();

    assert!(!scope.is_tracking());
    assert_eq!(scope.validate_session(), None);
    assert_eq!(scope.rating(), Some(RateRating::Excellent));

    let entry = scope
        .save_result("  tester ", "2025-06-01T12:00:00Z")
        .expect("valid session");
    assert_eq!(entry.username, "tester");
    assert_eq!(entry.max_rate, 1000.0);
    assert_eq!(entry.average_rate, 1000.0);
    assert_eq!(entry.data_points, scope.history().len());

    let mut board = Leaderboard::new();
    board.insert(entry);
    assert_eq!(board.top().len(), 1);
}

#[test]
fn test_stop_tracking_resets_quality_indicator() {
    let (clock, mut scope) = engine();
    scope.start_tracking();
    replay_device(&clock, &mut scope, 1, 200);
    assert!(scope.drain_events().contains(&PollScopeEvent::QualityChanged(MovementQuality::Good)));

    scope.stop_tracking();
    let events = scope.drain_events();
    assert_eq!(events.last(), Some(&PollScopeEvent::QualityChanged(MovementQuality::None)));
}

#[test]
fn test_frame_metrics_published_each_second() {
    let (clock, mut scope) = engine();
    scope.start_tracking();
    replay_device(&clock, &mut scope, 1, 2000);

    let metrics: Vec<FrameMetrics> = scope
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            PollScopeEvent::FrameMetrics(metrics) => Some(metrics),
            _ => None,
        })
        .collect();
    assert_eq!(metrics.len(), 2);
    // One frame per millisecond is clamped to the display ceiling.
    assert!(metrics.iter().all(|m| m.fps == 144));
}

#[test]
fn test_empty_session_cannot_be_saved() {
    let (_clock, scope) = engine();
    assert_eq!(scope.validate_session(), Some("No data to save".to_string()));
    assert_eq!(
        scope.save_result("tester", "2025-06-01"),
        Err(SaveError::Validation(ValidationError::Empty))
    );
    assert_eq!(
        scope.save_result("x", "2025-06-01"),
        Err(SaveError::UsernameTooShort)
    );
}

#[test]
fn test_validator_cases() {
    let points = |rate: f64, n: usize| -> Vec<RatePoint> {
        (0..n).map(|i| RatePoint::new(rate, i as f64)).collect()
    };
    assert!(validate_session(&[]).is_some());
    assert!(validate_session(&points(1000.0, 9)).is_some());
    assert!(validate_session(&points(1000.0, 10)).is_none());
    assert!(validate_session(&points(50.0, 10)).is_some());
    assert!(validate_session(&points(9000.0, 10)).is_some());

    let mut broken = points(1000.0, 10);
    broken[3].rate = f64::NAN;
    assert_eq!(
        validate_session(&broken),
        Some("Invalid data format".to_string())
    );
}

#[test]
fn test_diagnostics_lag_of_8ms() {
    let (clock, mut scope) = engine();
    scope.run_diagnostics();
    assert_eq!(scope.diagnostic_phase(), DiagnosticPhase::Lag);

    for _ in 0..10 {
        clock.advance(100.0);
        let now = clock.now_ms();
        scope.on_click(ClickEvent::new(now, now - 8.0));
        scope.pump();
    }

    let result = scope.finish_diagnostics().expect("diagnostic result");
    assert_relative_eq!(result.input_lag_ms, 8.0);
    assert_eq!(scope.diagnostic_phase(), DiagnosticPhase::Idle);

    let events = scope.drain_events();
    assert!(events.contains(&PollScopeEvent::DiagnosticsCompleted(result)));
    assert_eq!(scope.last_diagnostic_result(), Some(result));

    let ratings = DiagnosticRatings::from(&result);
    assert_eq!(ratings.input_lag, Rating::Good);
}

#[test]
fn test_diagnostics_run_to_completion_on_timers() {
    let (clock, mut scope) = engine();
    scope.run_diagnostics();
    for _ in 0..9000 {
        clock.advance(1.0);
        scope.pump();
    }

    let phases: Vec<DiagnosticPhase> = scope
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            PollScopeEvent::PhaseChanged(phase) => Some(phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            DiagnosticPhase::Lag,
            DiagnosticPhase::Debounce,
            DiagnosticPhase::Stability,
            DiagnosticPhase::Idle
        ]
    );
    let result = scope.last_diagnostic_result().expect("completed");
    assert_eq!(result.sample_count, 0);
    assert_eq!(result.stability_pct, 0.0);
}

#[test]
fn test_tracking_and_diagnostics_are_exclusive() {
    let (clock, mut scope) = engine();
    scope.start_tracking();
    replay_device(&clock, &mut scope, 1, 100);
    assert!(scope.is_tracking());

    scope.run_diagnostics();
    assert!(!scope.is_tracking());
    assert_eq!(scope.diagnostic_phase(), DiagnosticPhase::Lag);

    scope.drain_events();
    // Moves no longer reach the estimator.
    replay_device(&clock, &mut scope, 1, 100);
    assert!(estimates(&scope.drain_events()).is_empty());

    scope.start_tracking();
    assert_eq!(scope.diagnostic_phase(), DiagnosticPhase::Idle);
    assert!(scope.history().is_empty());
    assert!(scope.last_diagnostic_result().is_none());
}

#[test]
fn test_config_file_loading() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{ "diagnostics": {{ "phase_duration_ms": 500.0 }} }}"#).expect("write");
    let path = file.path().to_str().expect("utf-8 path");

    let scope = PollScope::from_config_file(ManualClock::new(0.0), path).expect("config");
    assert_eq!(scope.config().diagnostics.phase_duration_ms, 500.0);
    assert_eq!(scope.config().estimator.sample_window_ms, 100.0);

    assert!(PollScope::from_config_file(ManualClock::new(0.0), "/nonexistent/pollscope.json").is_err());
}
