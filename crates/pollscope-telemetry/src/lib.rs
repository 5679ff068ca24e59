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

//! # PollScope Telemetry
//!
//! Everything that observes the measurement rather than performing it: the
//! host frame-rate watchdog, the history of accepted estimates, and the
//! heuristics that turn a finished history or diagnostic report into ratings
//! and advice.

#![warn(missing_docs)]

pub mod analysis;
pub mod frame_monitor;
pub mod history;
pub mod rating;

pub use analysis::{analyze_history, AnalysisItem, AnalysisKind};
pub use frame_monitor::FrameRateMonitor;
pub use history::RateHistory;
pub use rating::{DiagnosticRatings, Rating, RateRating};
