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

//! Normalization of raw rate measurements against device quantization levels.
//!
//! Pointing devices almost always poll at one of a handful of standard
//! rates. A measured value close to one of them is snapped to it; anything
//! else is rounded, and implausible values are rejected outright.

use serde::{Deserialize, Serialize};

/// The standard device polling rates, in ascending order (Hz).
pub const CANONICAL_RATES: [u32; 7] = [125, 250, 500, 1000, 2000, 4000, 8000];

/// Lowest rate accepted by the sanitizer (Hz).
pub const MIN_PLAUSIBLE_RATE: f64 = 60.0;
/// Highest rate accepted by the sanitizer (Hz).
pub const MAX_PLAUSIBLE_RATE: f64 = 8000.0;
/// Relative distance under which a value snaps to a canonical rate.
pub const SNAP_TOLERANCE: f64 = 0.15;

/// Outcome of sanitizing a raw rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SanitizedRate {
    /// The value was close enough to a canonical rate and snapped to it.
    Canonical(u32),
    /// The value was plausible but not near a canonical rate; it was rounded.
    Rounded(u32),
    /// The value was non-finite or outside the plausible range.
    Invalid,
}

impl SanitizedRate {
    /// The sanitized rate in Hz, or `None` if the input was invalid.
    pub fn hz(&self) -> Option<f64> {
        match self {
            SanitizedRate::Canonical(hz) | SanitizedRate::Rounded(hz) => Some(f64::from(*hz)),
            SanitizedRate::Invalid => None,
        }
    }

    /// Returns `true` unless the input was rejected.
    pub fn is_valid(&self) -> bool {
        !matches!(self, SanitizedRate::Invalid)
    }

    /// Numeric form where `Invalid` collapses to `0.0`.
    pub fn or_zero(&self) -> f64 {
        self.hz().unwrap_or(0.0)
    }
}

/// Validates and quantizes raw rate measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSanitizer {
    min_rate: f64,
    max_rate: f64,
    snap_tolerance: f64,
}

impl RateSanitizer {
    /// Creates a sanitizer with the standard plausibility bounds.
    pub fn new() -> Self {
        Self {
            min_rate: MIN_PLAUSIBLE_RATE,
            max_rate: MAX_PLAUSIBLE_RATE,
            snap_tolerance: SNAP_TOLERANCE,
        }
    }

    /// Sanitizes a raw rate in Hz.
    pub fn sanitize(&self, raw: f64) -> SanitizedRate {
        if !raw.is_finite() || raw < self.min_rate || raw > self.max_rate {
            return SanitizedRate::Invalid;
        }

        let closest = closest_canonical(raw);
        let closest_hz = f64::from(closest);
        if (raw - closest_hz).abs() / closest_hz < self.snap_tolerance {
            SanitizedRate::Canonical(closest)
        } else {
            SanitizedRate::Rounded(raw.round() as u32)
        }
    }
}

impl Default for RateSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds the canonical rate nearest to `raw`.
///
/// Ties keep the first candidate met in ascending order, i.e. the smaller rate.
pub fn closest_canonical(raw: f64) -> u32 {
    CANONICAL_RATES
        .iter()
        .copied()
        .fold(CANONICAL_RATES[0], |best, candidate| {
            if (f64::from(candidate) - raw).abs() < (f64::from(best) - raw).abs() {
                candidate
            } else {
                best
            }
        })
}

/// Numeric shorthand for [`RateSanitizer::sanitize`]; invalid input yields `0.0`.
pub fn sanitize_rate(raw: f64) -> f64 {
    RateSanitizer::new().sanitize(raw).or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_values_are_kept() {
        for rate in CANONICAL_RATES {
            assert_eq!(
                RateSanitizer::new().sanitize(f64::from(rate)),
                SanitizedRate::Canonical(rate)
            );
        }
    }

    #[test]
    fn near_canonical_values_snap() {
        assert_eq!(sanitize_rate(1050.0), 1000.0);
        assert_eq!(sanitize_rate(940.0), 1000.0);
        assert_eq!(sanitize_rate(480.0), 500.0);
    }

    #[test]
    fn distant_values_are_rounded() {
        assert_eq!(
            RateSanitizer::new().sanitize(1400.0),
            SanitizedRate::Rounded(1400)
        );
        assert_eq!(sanitize_rate(700.4), 700.0);
        assert_eq!(sanitize_rate(700.5), 701.0);
    }

    #[test]
    fn implausible_values_are_invalid() {
        let sanitizer = RateSanitizer::new();
        assert_eq!(sanitizer.sanitize(f64::NAN), SanitizedRate::Invalid);
        assert_eq!(sanitizer.sanitize(f64::INFINITY), SanitizedRate::Invalid);
        assert_eq!(sanitizer.sanitize(50_000.0), SanitizedRate::Invalid);
        assert_eq!(sanitizer.sanitize(59.9), SanitizedRate::Invalid);
        assert_eq!(sanitize_rate(f64::NAN), 0.0);
        assert_eq!(sanitize_rate(50_000.0), 0.0);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(RateSanitizer::new().sanitize(60.0), SanitizedRate::Rounded(60));
        assert_eq!(
            RateSanitizer::new().sanitize(8000.0),
            SanitizedRate::Canonical(8000)
        );
    }

    #[test]
    fn ties_resolve_to_the_smaller_rate() {
        assert_eq!(closest_canonical(375.0), 250);
        assert_eq!(closest_canonical(750.0), 500);
        assert_eq!(closest_canonical(3000.0), 2000);
    }

    #[test]
    fn output_stays_in_the_allowed_set() {
        let mut raw = -100.0;
        while raw < 9000.0 {
            let out = sanitize_rate(raw);
            let canonical = CANONICAL_RATES.iter().any(|&r| f64::from(r) == out);
            let integral = out.fract() == 0.0 && (60.0..=8000.0).contains(&out);
            assert!(out == 0.0 || canonical || integral, "{raw} -> {out}");
            raw += 7.3;
        }
    }
}
