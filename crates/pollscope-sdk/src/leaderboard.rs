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

//! Leaderboard records built from validated sessions.
//!
//! Storing the leaderboard is up to the host; entries serialize with serde
//! using camelCase keys.

use pollscope_core::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest accepted username, in characters, after trimming.
pub const MIN_USERNAME_LEN: usize = 3;
/// Longest accepted username, in characters, after trimming.
pub const MAX_USERNAME_LEN: usize = 20;
/// Number of entries shown on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// Why a session could not be turned into a leaderboard entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    /// The username is blank.
    #[error("Username is required")]
    MissingUsername,
    /// The username is shorter than [`MIN_USERNAME_LEN`].
    #[error("Username must be at least {MIN_USERNAME_LEN} characters")]
    UsernameTooShort,
    /// The username is longer than [`MAX_USERNAME_LEN`].
    #[error("Username must be less than {MAX_USERNAME_LEN} characters")]
    UsernameTooLong,
    /// The recorded session failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Trims `raw` and checks its length.
pub fn normalize_username(raw: &str) -> Result<String, SaveError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        Err(SaveError::MissingUsername)
    } else if len < MIN_USERNAME_LEN {
        Err(SaveError::UsernameTooShort)
    } else if len > MAX_USERNAME_LEN {
        Err(SaveError::UsernameTooLong)
    } else {
        Ok(trimmed.to_string())
    }
}

/// One saved session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Who recorded the session.
    pub username: String,
    /// Highest rate of the session, in Hz.
    pub max_rate: f64,
    /// Rounded mean rate of the session, in Hz.
    pub average_rate: f64,
    /// When the session was saved, as supplied by the host.
    pub date: String,
    /// Number of estimates the session accumulated.
    pub data_points: usize,
}

/// Entries ordered by maximum rate, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Creates an empty leaderboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a leaderboard from stored entries in any order.
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.max_rate.total_cmp(&a.max_rate));
        Self { entries }
    }

    /// Loads a leaderboard from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Serializes the leaderboard to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Inserts an entry, keeping the order. Ties keep insertion order.
    pub fn insert(&mut self, entry: LeaderboardEntry) {
        let index = self
            .entries
            .partition_point(|existing| existing.max_rate >= entry.max_rate);
        self.entries.insert(index, entry);
    }

    /// The best [`LEADERBOARD_SIZE`] entries.
    pub fn top(&self) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(LEADERBOARD_SIZE)]
    }

    /// Every entry.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(username: &str, max_rate: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            username: username.to_string(),
            max_rate,
            average_rate: max_rate,
            date: "2025-01-01T00:00:00Z".to_string(),
            data_points: 10,
        }
    }

    #[test]
    fn usernames_are_trimmed_and_bounded() {
        assert_eq!(normalize_username("  ace  "), Ok("ace".to_string()));
        assert_eq!(normalize_username("   "), Err(SaveError::MissingUsername));
        assert_eq!(normalize_username("ab"), Err(SaveError::UsernameTooShort));
        assert_eq!(
            normalize_username("a_very_long_username_indeed"),
            Err(SaveError::UsernameTooLong)
        );
        assert!(normalize_username(&"x".repeat(MAX_USERNAME_LEN)).is_ok());
    }

    #[test]
    fn entries_stay_sorted_by_max_rate() {
        let mut board = Leaderboard::new();
        board.insert(entry("slow", 125.0));
        board.insert(entry("fast", 8000.0));
        board.insert(entry("mid", 1000.0));
        board.insert(entry("mid2", 1000.0));

        let names: Vec<&str> = board.entries().iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["fast", "mid", "mid2", "slow"]);
    }

    #[test]
    fn top_is_capped() {
        let board = Leaderboard::from_entries(
            (0..15).map(|i| entry("user", f64::from(i) * 100.0)).collect(),
        );
        assert_eq!(board.len(), 15);
        assert_eq!(board.top().len(), LEADERBOARD_SIZE);
        assert_eq!(board.top()[0].max_rate, 1400.0);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_string(&entry("ace", 1000.0)).expect("serialize");
        assert!(json.contains("\"maxRate\":1000.0"));
        assert!(json.contains("\"dataPoints\":10"));

        let board = Leaderboard::from_json(&format!("[{json}]")).expect("parse");
        assert_eq!(board.entries()[0].username, "ace");
    }
}
