//! Completed session journal

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One naturally completed countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: u64,
    pub preset_label: String,
    pub duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
}

/// In-memory history of completed sessions, most recent first
#[derive(Debug, Clone, Default)]
pub struct Journal {
    records: VecDeque<SessionRecord>,
    next_id: u64,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion at the front and return the stored record
    pub fn record(
        &mut self,
        preset_label: &str,
        duration_minutes: u32,
        completed_at: DateTime<Utc>,
    ) -> SessionRecord {
        self.next_id += 1;
        let record = SessionRecord {
            id: self.next_id,
            preset_label: preset_label.to_string(),
            duration_minutes,
            completed_at,
        };
        self.records.push_front(record.clone());
        record
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record, if any
    pub fn latest(&self) -> Option<&SessionRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<SessionRecord> {
        self.records.iter().cloned().collect()
    }
}
