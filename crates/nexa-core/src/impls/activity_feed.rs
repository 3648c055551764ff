//! InMemoryActivityFeed - 直近のドメインイベントを保持する EventSink
//!
//! 容量を超えたら古いものから捨てる。読み出しは新しい順。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DomainEvent;
use crate::ports::{Clock, EventSink};

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 50;

/// One feed line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub message: String,
    pub event: DomainEvent,
}

pub struct InMemoryActivityFeed {
    entries: Mutex<VecDeque<ActivityEntry>>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl InMemoryActivityFeed {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            clock,
        }
    }

    /// Newest first.
    pub fn recent(&self) -> Vec<ActivityEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().rev().cloned().collect()
    }
}

impl EventSink for InMemoryActivityFeed {
    fn emit(&self, event: DomainEvent) {
        if self.capacity == 0 {
            return;
        }
        let entry = ActivityEntry {
            at: self.clock.now(),
            message: event.message(),
            event,
        };
        tracing::debug!(message = %entry.message, "activity");
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }
}
