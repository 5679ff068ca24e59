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

//! # PollScope Lanes
//!
//! Hot-path pipelines of the continuous rate measurement: the noise-filtering
//! [`EventSampler`], the time-bounded [`SampleWindow`], and the
//! [`SlidingWindowEstimator`] that turns the window into sanitized estimates.
//!
//! Every operation here is O(window) at worst. The sampler never allocates;
//! the window grows with the event rate and each tick builds one rate buffer.

#![warn(missing_docs)]

pub mod estimator;
pub mod sampler;
pub mod window;

pub use estimator::{SlidingWindowEstimator, TickOutcome};
pub use sampler::EventSampler;
pub use window::SampleWindow;
