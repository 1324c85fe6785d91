//! In-memory game log
//!
//! Effects and turn transitions record what happened; the consumer (CLI,
//! tests) owns display and history truncation. Entries below the
//! configured verbosity are dropped at the point of logging.

use serde::{Deserialize, Serialize};

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - all actions and state changes
    Verbose = 3,
}

/// A log entry with its verbosity level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLog {
    verbosity: VerbosityLevel,
    entries: Vec<LogEntry>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLog {
            verbosity,
            entries: Vec::new(),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn add(&mut self, level: VerbosityLevel, message: impl Into<String>) {
        if level <= self.verbosity {
            self.entries.push(LogEntry {
                level,
                message: message.into(),
            });
        }
    }

    pub fn minimal(&mut self, message: impl Into<String>) {
        self.add(VerbosityLevel::Minimal, message);
    }

    pub fn normal(&mut self, message: impl Into<String>) {
        self.add(VerbosityLevel::Normal, message);
    }

    pub fn verbose(&mut self, message: impl Into<String>) {
        self.add(VerbosityLevel::Verbose, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GameLog {
    fn default() -> Self {
        Self::new()
    }
}
