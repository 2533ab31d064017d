use std::fmt;

use crate::engine::key_stats::KeyStatsStore;
use crate::engine::weak_keys::{self, WeakKey};

pub const ACCURACY_FLOOR: u32 = 90;
pub const WPM_FLOOR: u32 = 35;
pub const HESITATION_LIMIT_MS: u64 = 400;

/// Positional accuracy in percent. Every index up to the longer of the two
/// texts counts; an index past either end is a miss. No realignment is done
/// after an insertion or a skipped character.
pub fn accuracy(expected: &str, typed: &str) -> u32 {
    let expected: Vec<char> = expected.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let total = expected.len().max(typed.len());
    if total == 0 {
        return 0;
    }
    let correct = expected
        .iter()
        .zip(typed.iter())
        .filter(|(e, t)| e == t)
        .count();
    (100.0 * correct as f64 / total as f64).round() as u32
}

/// Words per minute using the five-characters-per-word convention.
pub fn wpm(char_count: usize, seconds: f64) -> u32 {
    if seconds <= 0.0 {
        return 0;
    }
    let words = char_count as f64 / 5.0;
    (words / (seconds / 60.0)).round() as u32
}

pub fn avg_hesitation(hesitations: &[u64]) -> u64 {
    if hesitations.is_empty() {
        return 0;
    }
    let total: u64 = hesitations.iter().sum();
    (total as f64 / hesitations.len() as f64).round() as u64
}

/// A piece of feedback about a finished session.
#[derive(Clone, Debug, PartialEq)]
pub enum Issue {
    LowAccuracy,
    LowSpeed,
    UnsteadyRhythm,
    StrugglingKeys(Vec<WeakKey>),
    NoMajorIssues,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::LowAccuracy => write!(
                f,
                "Your accuracy is below {ACCURACY_FLOOR}%. Slow down and focus on correctness."
            ),
            Issue::LowSpeed => write!(
                f,
                "Your WPM is below {WPM_FLOOR}. Practice daily small sessions to build speed."
            ),
            Issue::UnsteadyRhythm => write!(
                f,
                "Your average hesitation is high. You're pausing a lot between keys. \
                 Try to keep a steady rhythm."
            ),
            Issue::StrugglingKeys(keys) => {
                write!(f, "You often struggle with keys: ")?;
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "{} (mistakes: {}/{})",
                        display_key(k.key),
                        k.mistakes,
                        k.presses
                    )?;
                }
                Ok(())
            }
            Issue::NoMajorIssues => write!(f, "Great job! No major issues detected."),
        }
    }
}

fn display_key(key: char) -> String {
    match key {
        ' ' => "SPACE".to_string(),
        '\n' => "ENTER".to_string(),
        '\t' => "TAB".to_string(),
        _ => key.to_uppercase().collect(),
    }
}

/// Feedback in a fixed order: accuracy, speed, rhythm, then struggling keys.
/// A clean session yields a single `NoMajorIssues`.
pub fn issues(accuracy: u32, wpm: u32, avg_hesitation: u64, stats: &KeyStatsStore) -> Vec<Issue> {
    let mut out = Vec::new();
    if accuracy < ACCURACY_FLOOR {
        out.push(Issue::LowAccuracy);
    }
    if wpm < WPM_FLOOR {
        out.push(Issue::LowSpeed);
    }
    if avg_hesitation > HESITATION_LIMIT_MS {
        out.push(Issue::UnsteadyRhythm);
    }
    let worst = weak_keys::struggling(stats);
    if !worst.is_empty() {
        out.push(Issue::StrugglingKeys(worst));
    }
    if out.is_empty() {
        out.push(Issue::NoMajorIssues);
    }
    out
}
