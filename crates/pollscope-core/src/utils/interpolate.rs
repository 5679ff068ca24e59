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

//! Eased interpolation of displayed values.
//!
//! The core keeps no animation state. A host that wants to animate a displayed
//! rate towards a new estimate records the start value and start time itself
//! and calls [`interpolate`] from its own render loop.

/// Cubic ease-out curve, `1 - (1 - p)^3`, with `p` clamped to `[0, 1]`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    1.0 - (1.0 - p).powi(3)
}

/// Value between `start` and `target` after `elapsed_fraction` of the animation.
pub fn interpolate(start: f64, target: f64, elapsed_fraction: f64) -> f64 {
    start + (target - start) * ease_out_cubic(elapsed_fraction)
}
