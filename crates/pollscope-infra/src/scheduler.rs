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

//! A single-threaded cooperative scheduler.
//!
//! The scheduler never invokes anything. The host drains due work with
//! [`CooperativeScheduler::pop_due`] and [`CooperativeScheduler::frame_tasks`]
//! and hands each task to its owner, so owners are free to cancel or register
//! tasks while a batch is being dispatched.

use pollscope_core::{Scheduler, TaskHandle, TaskKind};
use std::collections::BTreeMap;

/// Shortest period accepted for interval tasks, in milliseconds.
pub const MIN_INTERVAL_MS: f64 = 1.0;

#[derive(Debug, Clone)]
struct Entry<T> {
    kind: TaskKind,
    due_ms: f64,
    task: T,
}

/// Registry of frame and timer tasks keyed by [`TaskHandle`].
#[derive(Debug, Clone)]
pub struct CooperativeScheduler<T> {
    next_id: u64,
    entries: BTreeMap<TaskHandle, Entry<T>>,
}

impl<T: Clone> CooperativeScheduler<T> {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }

    /// Removes and returns the earliest timer due at or before `now_ms`.
    ///
    /// Timeouts are consumed. Intervals are re-armed one period after `now_ms`,
    /// so a host that pumped late skips the missed periods instead of
    /// replaying them, and an interval fires at most once per pump time.
    /// Ties on the due time go to the earlier registration.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TaskHandle, T)> {
        let handle = self
            .entries
            .iter()
            .filter(|(_, e)| !matches!(e.kind, TaskKind::Frame) && e.due_ms <= now_ms)
            .min_by(|(ha, a), (hb, b)| a.due_ms.total_cmp(&b.due_ms).then(ha.cmp(hb)))
            .map(|(handle, _)| *handle)?;

        match self.entries.get(&handle).map(|e| e.kind) {
            Some(TaskKind::Interval { period_ms }) => {
                let entry = self.entries.get_mut(&handle)?;
                entry.due_ms = now_ms + period_ms;
                Some((handle, entry.task.clone()))
            }
            _ => self.entries.remove(&handle).map(|e| (handle, e.task)),
        }
    }

    /// Snapshot of every frame task, in registration order.
    ///
    /// Frame tasks stay registered until cancelled; the host should check
    /// [`Scheduler::is_pending`] before dispatching each one if earlier
    /// dispatches may cancel later ones.
    pub fn frame_tasks(&self) -> Vec<(TaskHandle, T)> {
        self.entries
            .iter()
            .filter(|(_, e)| matches!(e.kind, TaskKind::Frame))
            .map(|(handle, e)| (*handle, e.task.clone()))
            .collect()
    }

    /// Due time of the next timer, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.entries
            .values()
            .filter(|e| !matches!(e.kind, TaskKind::Frame))
            .map(|e| e.due_ms)
            .reduce(f64::min)
    }

    /// Number of registered tasks of any kind.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Revokes every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> Scheduler<T> for CooperativeScheduler<T> {
    fn schedule(&mut self, kind: TaskKind, now_ms: f64, task: T) -> TaskHandle {
        let handle = TaskHandle::from_raw(self.next_id);
        self.next_id += 1;

        let (kind, due_ms) = match kind {
            TaskKind::Frame => (kind, now_ms),
            TaskKind::Timeout { delay_ms } => (kind, now_ms + delay_ms.max(0.0)),
            TaskKind::Interval { period_ms } => {
                let period_ms = if period_ms < MIN_INTERVAL_MS {
                    log::warn!("Interval of {period_ms} ms raised to {MIN_INTERVAL_MS} ms");
                    MIN_INTERVAL_MS
                } else {
                    period_ms
                };
                (TaskKind::Interval { period_ms }, now_ms + period_ms)
            }
        };

        log::trace!("Scheduled {handle} ({kind:?}) due at {due_ms:.2} ms");
        self.entries.insert(handle, Entry { kind, due_ms, task });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        let removed = self.entries.remove(&handle).is_some();
        if removed {
            log::trace!("Cancelled {handle}");
        }
        removed
    }

    fn is_pending(&self, handle: TaskHandle) -> bool {
        self.entries.contains_key(&handle)
    }
}

impl<T: Clone> Default for CooperativeScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
