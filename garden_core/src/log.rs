//! BattleLog - Append-only battle narration

use serde::{Deserialize, Serialize};

/// Category of a narration line, used by presentation for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Info,
    Damage,
    Heal,
    Win,
    Loss,
    Effect,
}

/// A single narration line. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLogEntry {
    pub id: u64,
    pub text: String,
    pub category: LogCategory,
}

/// Ordered, append-only sequence of narration lines
///
/// The battle engine only writes here; it never reads entries back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleLog {
    entries: Vec<BattleLogEntry>,
    next_id: u64,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line and return its id
    pub fn push(&mut self, text: impl Into<String>, category: LogCategory) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(BattleLogEntry {
            id,
            text: text.into(),
            category,
        });
        id
    }

    pub fn entries(&self) -> &[BattleLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&BattleLogEntry> {
        self.entries.last()
    }

    /// Count entries of one category
    pub fn count(&self, category: LogCategory) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }
}
