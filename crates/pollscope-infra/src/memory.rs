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

//! sysinfo-based implementation of the MemoryProbe trait.

use pollscope_core::{MemoryProbe, MemorySnapshot};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// A memory probe reporting this process's resident memory against the
/// host's total memory, using the `sysinfo` crate.
pub struct SysinfoMemoryProbe {
    system: System,
    pid: Option<Pid>,
}

impl SysinfoMemoryProbe {
    /// Creates a new SysinfoMemoryProbe bound to the current process.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(err) => {
                log::warn!("Current process id unavailable, memory reports disabled: {err}");
                None
            }
        };
        Self {
            system: System::new(),
            pid,
        }
    }
}

impl std::fmt::Debug for SysinfoMemoryProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysinfoMemoryProbe")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl MemoryProbe for SysinfoMemoryProbe {
    fn snapshot(&mut self) -> Option<MemorySnapshot> {
        let pid = self.pid?;
        self.system.refresh_memory();
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let total_bytes = self.system.total_memory();
        if total_bytes == 0 {
            return None;
        }
        let used_bytes = self.system.process(pid)?.memory();

        Some(MemorySnapshot {
            used_bytes,
            total_bytes,
        })
    }
}

impl Default for SysinfoMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_consistent_when_available() {
        let mut probe = SysinfoMemoryProbe::new();
        // Sandboxed hosts may hide process info; only check what is reported.
        if let Some(snapshot) = probe.snapshot() {
            assert!(snapshot.total_bytes > 0);
            assert!(snapshot.is_consistent());
        }
    }
}
