use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

pub const HISTORY_CAPACITY: usize = 20;

/// Past session results, newest first, never longer than `HISTORY_CAPACITY`.
/// Serializes as a bare JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    sessions: Vec<SessionResult>,
}

impl History {
    /// Build from stored entries, dropping anything past the capacity.
    pub fn from_sessions(mut sessions: Vec<SessionResult>) -> Self {
        sessions.truncate(HISTORY_CAPACITY);
        Self { sessions }
    }

    /// Put `result` in front and evict the oldest beyond capacity.
    pub fn push(&mut self, result: SessionResult) {
        self.sessions.insert(0, result);
        self.sessions.truncate(HISTORY_CAPACITY);
    }

    pub fn sessions(&self) -> &[SessionResult] {
        &self.sessions
    }

    pub fn into_sessions(self) -> Vec<SessionResult> {
        self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
