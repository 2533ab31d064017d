use std::time::Instant;

use chrono::Local;
use thiserror::Error;
use tracing::debug;

use crate::engine::analytics;
use crate::engine::key_stats::KeyStatsStore;
use crate::session::input;
use crate::session::result::SessionReport;

/// Gaps at or above this many milliseconds are idle breaks, not hesitation.
pub const HESITATION_CEILING_MS: u64 = 2000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "Not started",
            SessionState::Running => "Running",
            SessionState::Finished => "Finished",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("target text is empty; enter or select some text first")]
    InvalidInput,
}

/// One typing test. Created idle, started with a target text, fed buffer
/// snapshots while running, and finished either explicitly or once the buffer
/// is as long as the target.
#[derive(Debug, Default)]
pub struct Session {
    pub(super) expected_text: String,
    pub(super) expected: Vec<char>,
    pub(super) typed_text: String,
    pub(super) typed_len: usize,
    pub(super) state: SessionState,
    pub(super) started_at: Option<Instant>,
    pub(super) ended_at: Option<Instant>,
    pub(super) last_event_at: Option<Instant>,
    pub(super) hesitations: Vec<u64>,
    pub(super) key_stats: KeyStatsStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a test against `target`, discarding whatever came before.
    /// The clock starts on the first captured character, not here.
    pub fn start(&mut self, target: &str) -> Result<(), SessionError> {
        if target.trim().is_empty() {
            return Err(SessionError::InvalidInput);
        }
        *self = Self {
            expected_text: target.to_string(),
            expected: target.chars().collect(),
            state: SessionState::Running,
            ..Self::default()
        };
        debug!(target_len = self.expected.len(), "session started");
        Ok(())
    }

    /// Feed the host's current input buffer. Returns the report when this
    /// event completes the test.
    pub fn on_character_event(&mut self, current: &str, now: Instant) -> Option<SessionReport> {
        if self.state != SessionState::Running {
            return None;
        }
        if input::capture(self, current, now) {
            self.finish(now)
        } else {
            None
        }
    }

    /// Stop the test and compute its report. Ignored unless running.
    pub fn finish(&mut self, now: Instant) -> Option<SessionReport> {
        if self.state != SessionState::Running {
            return None;
        }
        self.ended_at = Some(now);
        self.state = SessionState::Finished;
        let report = SessionReport::from_session(self, Local::now());
        debug!(
            wpm = report.result.wpm,
            accuracy = report.result.accuracy,
            avg_hesitation = report.result.avg_hesitation,
            "session finished"
        );
        Some(report)
    }

    pub fn reset(&mut self) {
        if self.state != SessionState::Idle {
            debug!(from = self.state.label(), "session reset");
        }
        *self = Self::default();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn expected_text(&self) -> &str {
        &self.expected_text
    }

    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    pub fn hesitations(&self) -> &[u64] {
        &self.hesitations
    }

    pub fn key_stats(&self) -> &KeyStatsStore {
        &self.key_stats
    }

    pub fn has_started_typing(&self) -> bool {
        self.started_at.is_some()
    }

    /// Seconds between the first captured character and the end of the test
    /// (or `now` while it is still running).
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).as_secs_f64(),
            (Some(start), None) => now.saturating_duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn progress(&self) -> f64 {
        if self.expected.is_empty() {
            return 0.0;
        }
        (self.typed_len as f64 / self.expected.len() as f64).min(1.0)
    }

    pub fn live_wpm(&self, now: Instant) -> u32 {
        analytics::wpm(self.typed_len, self.elapsed_secs(now))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.key_stats().is_empty());
        assert!(session.hesitations().is_empty());
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn test_start_rejects_blank_text() {
        let mut session = Session::new();
        assert_eq!(session.start(""), Err(SessionError::InvalidInput));
        assert_eq!(session.start("  \n\t "), Err(SessionError::InvalidInput));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_rejection_keeps_running_session() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("hello").unwrap();
        session.on_character_event("h", t0);
        assert!(session.start("   ").is_err());
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.typed_text(), "h");
    }

    #[test]
    fn test_start_keeps_original_formatting() {
        let mut session = Session::new();
        session.start("  padded text ").unwrap();
        assert_eq!(session.expected_text(), "  padded text ");
        assert_eq!(session.state(), SessionState::Running);
        assert!(!session.has_started_typing());
    }

    #[test]
    fn test_start_discards_previous_session() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abc").unwrap();
        session.on_character_event("x", t0);
        session.on_character_event("xy", at(t0, 100));
        assert!(!session.key_stats().is_empty());

        session.start("new text").unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.key_stats().is_empty());
        assert!(session.hesitations().is_empty());
        assert_eq!(session.typed_text(), "");
        assert!(!session.has_started_typing());
    }

    #[test]
    fn test_events_ignored_while_idle_or_finished() {
        let mut session = Session::new();
        let t0 = Instant::now();
        assert!(session.on_character_event("a", t0).is_none());
        assert!(session.key_stats().is_empty());

        session.start("ab").unwrap();
        session.on_character_event("a", t0);
        assert!(session.finish(at(t0, 500)).is_some());
        assert!(session.on_character_event("ab", at(t0, 600)).is_none());
        assert_eq!(session.typed_text(), "a");
        assert!(session.finish(at(t0, 700)).is_none());
    }

    #[test]
    fn test_finish_without_typing() {
        let mut session = Session::new();
        session.start("abc").unwrap();
        let report = session.finish(Instant::now()).unwrap();
        assert_eq!(report.result.wpm, 0);
        assert_eq!(report.result.accuracy, 0);
        assert_eq!(report.result.time_taken, 0);
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn test_auto_finish_on_length() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("hi").unwrap();
        assert!(session.on_character_event("h", t0).is_none());
        let report = session.on_character_event("hi", at(t0, 200));
        assert!(report.is_some());
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.progress(), 1.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abc").unwrap();
        session.on_character_event("a", t0);
        session.on_character_event("ab", at(t0, 100));

        session.reset();
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.key_stats().is_empty());
        assert!(session.hesitations().is_empty());
        assert_eq!(session.expected_text(), "");
    }

    #[test]
    fn test_elapsed_and_live_wpm() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abcdefghij").unwrap();
        assert_eq!(session.elapsed_secs(at(t0, 5000)), 0.0);
        session.on_character_event("a", t0);
        for (i, ms) in [(2, 1000), (3, 2000), (4, 3000), (5, 4000)] {
            let buf: String = "abcdefghij".chars().take(i).collect();
            session.on_character_event(&buf, at(t0, ms));
        }
        assert!((session.elapsed_secs(at(t0, 6000)) - 6.0).abs() < 1e-9);
        // 5 chars = 1 word in 6 s
        assert_eq!(session.live_wpm(at(t0, 6000)), 10);
    }

    #[test]
    fn test_sessions_are_independent() {
        let t0 = Instant::now();
        let mut first = Session::new();
        let mut second = Session::new();
        first.start("aa").unwrap();
        second.start("bb").unwrap();
        first.on_character_event("x", t0);
        assert!(second.key_stats().is_empty());
        assert!(!second.has_started_typing());
    }
}
