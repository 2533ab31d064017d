use std::collections::HashMap;

/// Press and mistake counts for a single key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyCounter {
    pub presses: u32,
    pub mistakes: u32,
}

impl KeyCounter {
    pub fn mistake_rate(&self) -> f64 {
        self.mistakes as f64 / self.presses.max(1) as f64
    }
}

/// Per-key counters for one session, keyed by the lowercased character.
#[derive(Clone, Debug, Default)]
pub struct KeyStatsStore {
    pub stats: HashMap<char, KeyCounter>,
}

impl KeyStatsStore {
    /// Count a press of `typed`. It is a mistake when `expected` is a different
    /// character (case-sensitive) or there is no expected character at all.
    pub fn record(&mut self, typed: char, expected: Option<char>) {
        let stat = self.stats.entry(fold_key(typed)).or_default();
        stat.presses += 1;
        if expected != Some(typed) {
            stat.mistakes += 1;
        }
    }

    pub fn get_stat(&self, key: char) -> Option<&KeyCounter> {
        self.stats.get(&fold_key(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, KeyCounter)> + '_ {
        self.stats.iter().map(|(&key, &counter)| (key, counter))
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn total_mistakes(&self) -> u32 {
        self.stats.values().map(|s| s.mistakes).sum()
    }
}

fn fold_key(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}
