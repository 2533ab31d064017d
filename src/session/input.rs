use std::time::Instant;

use tracing::trace;

use crate::session::state::{HESITATION_CEILING_MS, Session};

/// Apply one snapshot of the input buffer to a running session.
///
/// Only growth of the buffer is attributed to a key: the newest character
/// (at index `len - 1`) counts as a press, and as a mistake when it differs
/// from the target at the same index. A shrinking or same-length buffer still
/// moves the clock but touches no counters.
///
/// Returns true once the buffer is at least as long as the target.
pub(super) fn capture(session: &mut Session, current: &str, now: Instant) -> bool {
    match session.last_event_at {
        None => session.started_at = Some(now),
        Some(last) => {
            let gap_ms = now.saturating_duration_since(last).as_millis() as u64;
            if gap_ms < HESITATION_CEILING_MS {
                session.hesitations.push(gap_ms);
            }
        }
    }
    session.last_event_at = Some(now);

    let previous_len = session.typed_len;
    session.typed_text.clear();
    session.typed_text.push_str(current);
    session.typed_len = current.chars().count();

    if session.typed_len > previous_len
        && let Some(typed) = current.chars().last()
    {
        let idx = session.typed_len - 1;
        let expected = session.expected.get(idx).copied();
        session.key_stats.record(typed, expected);
        trace!(idx, ?typed, ?expected, "keystroke");
    }

    session.typed_len >= session.expected.len()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::state::SessionState;

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn test_first_char_starts_clock_without_hesitation() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abc").unwrap();
        session.on_character_event("a", t0);
        assert!(session.has_started_typing());
        assert!(session.hesitations().is_empty());
    }

    #[test]
    fn test_long_pause_excluded_from_hesitations() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abcd").unwrap();
        session.on_character_event("a", t0);
        session.on_character_event("ab", at(t0, 2500));
        assert!(session.hesitations().is_empty());
        session.on_character_event("abc", at(t0, 4499));
        assert_eq!(session.hesitations(), &[1999]);
    }

    #[test]
    fn test_ceiling_itself_is_excluded() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abc").unwrap();
        session.on_character_event("a", t0);
        session.on_character_event("ab", at(t0, HESITATION_CEILING_MS));
        assert!(session.hesitations().is_empty());
    }

    #[test]
    fn test_mistake_attributed_to_typed_key() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("cat").unwrap();
        session.on_character_event("c", t0);
        session.on_character_event("co", at(t0, 300));
        let o = session.key_stats().get_stat('o').unwrap();
        assert_eq!((o.presses, o.mistakes), (1, 1));
        assert!(session.key_stats().get_stat('a').is_none());
        let c = session.key_stats().get_stat('c').unwrap();
        assert_eq!((c.presses, c.mistakes), (1, 0));
    }

    #[test]
    fn test_uppercase_counted_under_lowercase_key() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("Hello").unwrap();
        session.on_character_event("H", t0);
        session.on_character_event("Hh", at(t0, 100));
        let h = session.key_stats().get_stat('h').unwrap();
        assert_eq!((h.presses, h.mistakes), (2, 1));
    }

    #[test]
    fn test_backspace_moves_clock_but_not_counters() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abc").unwrap();
        session.on_character_event("a", t0);
        session.on_character_event("ax", at(t0, 100));
        session.on_character_event("a", at(t0, 250));
        assert_eq!(session.typed_text(), "a");
        assert_eq!(session.hesitations(), &[100, 150]);
        let a = session.key_stats().get_stat('a').unwrap();
        assert_eq!(a.presses, 1);
        let x = session.key_stats().get_stat('x').unwrap();
        assert_eq!((x.presses, x.mistakes), (1, 1));

        session.on_character_event("ab", at(t0, 400));
        let b = session.key_stats().get_stat('b').unwrap();
        assert_eq!((b.presses, b.mistakes), (1, 0));
    }

    #[test]
    fn test_buffer_cleared_to_empty() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abc").unwrap();
        session.on_character_event("a", t0);
        session.on_character_event("", at(t0, 100));
        assert_eq!(session.typed_text(), "");
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_pasted_chunk_counts_only_last_char() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("abcdef").unwrap();
        session.on_character_event("abc", t0);
        assert_eq!(session.key_stats().stats.len(), 1);
        assert!(session.key_stats().get_stat('c').is_some());
    }

    #[test]
    fn test_overlong_buffer_finishes() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("ab").unwrap();
        let report = session.on_character_event("abz", t0);
        assert!(report.is_some());
        let z = session.key_stats().get_stat('z').unwrap();
        assert_eq!(z.mistakes, 1);
    }

    #[test]
    fn test_multibyte_positions() {
        let mut session = Session::new();
        let t0 = Instant::now();
        session.start("héllo").unwrap();
        session.on_character_event("h", t0);
        session.on_character_event("hé", at(t0, 100));
        let e = session.key_stats().get_stat('é').unwrap();
        assert_eq!((e.presses, e.mistakes), (1, 0));
    }
}
