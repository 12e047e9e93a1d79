use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::value::Value;

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 50;

/// A finished calculation: what was evaluated and what came out
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub expression: String,
    pub result: Value,
}

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: Value,
    pub timestamp: DateTime<Utc>,
}

/// Calculation log, newest first. When full the oldest entry is dropped
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> History {
        History::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, eval: &Evaluation) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(HistoryEntry {
            expression: eval.expression.clone(),
            result: eval.result.clone(),
            timestamp: Utc::now(),
        });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entries whose expression contains `query`, case-insensitive
    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.expression.to_lowercase().contains(&query))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
