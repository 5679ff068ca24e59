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

//! Provides the data structures and contracts for host-performance telemetry.
//!
//! This module defines the abstract "what" of monitoring: the metrics a frame
//! monitor reports and the probe interface used to query host memory.
//! `pollscope-telemetry` computes the metrics and `pollscope-infra` provides
//! the concrete probes.

pub mod monitoring;

pub use self::monitoring::{FrameMetrics, MemoryProbe, MemorySnapshot, MAX_REPORTED_FPS};
