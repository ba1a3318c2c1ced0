//! Activity feed
//!
//! A short most-recent-first list of free-text activity lines, refreshed on a
//! fixed interval with occasional random insertions. Independent of any
//! conversation.

use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

pub const ACTIVITY_CAPACITY: usize = 5;
pub const ACTIVITY_INTERVAL: Duration = Duration::from_millis(2000);

/// Chance that a tick inserts a new entry
pub const INSERT_PROBABILITY: f64 = 0.02;
/// Draws above this mark a new entry as a success
const SUCCESS_THRESHOLD: f64 = 0.7;

const TICK_ACTIONS: [&str; 5] = [
    "Agent completed complex analysis",
    "Tool execution finished successfully",
    "New conversation started",
    "Performance optimization applied",
    "System checkpoint created",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Success,
    Info,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Relative time label, e.g. "Just now"
    pub time: String,
    pub action: String,
    pub kind: ActivityKind,
}

impl ActivityEntry {
    pub fn new(time: impl Into<String>, action: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            time: time.into(),
            action: action.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityFeed {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed pre-filled with the startup history
    pub fn seeded() -> Self {
        let mut feed = Self::new();
        let history = [
            ("15 min ago", "New agent configuration deployed", ActivityKind::Info),
            ("12 min ago", "System optimization completed", ActivityKind::Success),
            ("8 min ago", "Gemini started data analysis", ActivityKind::Active),
            ("5 min ago", "Claude generated creative content", ActivityKind::Info),
            ("2 min ago", "GPT-4 completed reasoning task", ActivityKind::Success),
        ];
        for (time, action, kind) in history {
            feed.push(ActivityEntry::new(time, action, kind));
        }
        feed
    }

    /// Insert at the front, dropping the oldest entries beyond capacity
    pub fn push(&mut self, entry: ActivityEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(ACTIVITY_CAPACITY);
    }

    /// One timer tick: maybe insert a random entry, returning it if so
    pub fn tick(&mut self, random: &mut dyn RandomSource) -> Option<&ActivityEntry> {
        if random.unit() >= INSERT_PROBABILITY {
            return None;
        }
        let action = TICK_ACTIONS[random.index(TICK_ACTIONS.len())];
        let kind = if random.unit() > SUCCESS_THRESHOLD {
            ActivityKind::Success
        } else {
            ActivityKind::Info
        };
        self.push(ActivityEntry::new("Just now", action, kind));
        self.entries.front()
    }

    /// Entries, most recent first
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
