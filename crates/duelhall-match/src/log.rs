//! Bounded action log.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::card::CardInstance;

/// Maximum retained log entries; the oldest entry is evicted first.
pub const LOG_CAPACITY: usize = 100;

/// One human-readable line in the room's action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The broadcast message, e.g. `"alice played Goblin to slot 2"`.
    pub message: String,
    /// Username of the acting player.
    pub actor: String,
    /// The action tag, e.g. `"play-card"`.
    pub action: String,
    /// Full card payload when the action concerned a specific card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardInstance>,
}

/// Ring buffer of the last [`LOG_CAPACITY`] entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    entries: VecDeque<LogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<LogEntry> for ActionLog {
    fn from_iter<I: IntoIterator<Item = LogEntry>>(iter: I) -> Self {
        let mut log = Self::new();
        for entry in iter {
            log.push(entry);
        }
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> LogEntry {
        LogEntry {
            message: format!("line {n}"),
            actor: "alice".into(),
            action: "draw".into(),
            card: None,
        }
    }

    #[test]
    fn test_log_evicts_oldest_at_capacity() {
        let mut log = ActionLog::new();
        for n in 0..LOG_CAPACITY + 5 {
            log.push(entry(n));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.entries().next().unwrap().message, "line 5");
    }

    #[test]
    fn test_log_preserves_order_below_capacity() {
        let mut log = ActionLog::new();
        log.push(entry(1));
        log.push(entry(2));
        let messages: Vec<_> = log.entries().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["line 1", "line 2"]);
    }
}
