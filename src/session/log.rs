//! In-memory session log, newest entry first

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Log entry category, rendered as the bracketed tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    /// Manual order filled
    Execution,
    /// Order placed by an analysis cycle
    Auto,
    /// Model reasoning
    Algo,
    System,
    Error,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LogKind::Execution => "EXECUTION",
            LogKind::Auto => "AUTO",
            LogKind::Algo => "ALGO",
            LogKind::System => "SYSTEM",
            LogKind::Error => "ERROR",
        };
        write!(f, "[{}]", tag)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp.format("%H:%M:%S"),
            self.kind,
            self.message
        )
    }
}

#[derive(Debug, Default)]
pub struct SessionLog {
    entries: VecDeque<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        self.entries.push_front(LogEntry {
            timestamp: Utc::now(),
            kind,
            message: message.into(),
        });
    }

    /// Entries, most recent first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
