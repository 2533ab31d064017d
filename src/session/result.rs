use std::time::Instant;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::engine::analytics::{self, Issue};
use crate::engine::weak_keys::{self, WeakKey};
use crate::generator::practice;
use crate::session::state::Session;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The persisted summary of one finished session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy: u32,
    /// Mean inter-key gap in milliseconds.
    pub avg_hesitation: u64,
    /// Whole seconds from first keystroke to finish.
    pub time_taken: u64,
    pub date: String,
}

impl SessionResult {
    pub fn from_session(session: &Session, recorded_at: DateTime<Local>) -> Self {
        // A finished session has ended_at set, so `now` is never consulted.
        let seconds = session.elapsed_secs(Instant::now());
        let typed_chars = session.typed_text().chars().count();

        Self {
            wpm: analytics::wpm(typed_chars, seconds),
            accuracy: analytics::accuracy(session.expected_text(), session.typed_text()),
            avg_hesitation: analytics::avg_hesitation(session.hesitations()),
            time_taken: seconds.round() as u64,
            date: recorded_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Everything the host shows once a session ends.
#[derive(Clone, Debug)]
pub struct SessionReport {
    pub result: SessionResult,
    pub issues: Vec<Issue>,
    pub weak_keys: Vec<WeakKey>,
    pub practice: String,
}

impl SessionReport {
    pub fn from_session(session: &Session, recorded_at: DateTime<Local>) -> Self {
        let result = SessionResult::from_session(session, recorded_at);
        let issues = analytics::issues(
            result.accuracy,
            result.wpm,
            result.avg_hesitation,
            session.key_stats(),
        );
        let weak_keys = weak_keys::rank(session.key_stats());
        let practice = practice::practice_text(&weak_keys);

        Self {
            result,
            issues,
            weak_keys,
            practice,
        }
    }

    pub fn has_practice(&self) -> bool {
        !practice::is_placeholder(&self.practice)
    }
}
