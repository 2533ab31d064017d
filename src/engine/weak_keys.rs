use std::cmp::Ordering;

use crate::engine::key_stats::KeyStatsStore;

/// How many keys feed the struggling-keys issue and the practice drill.
pub const TOP_WEAK_KEYS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct WeakKey {
    pub key: char,
    pub presses: u32,
    pub mistakes: u32,
    pub mistake_rate: f64,
}

/// All keys, worst first: mistake rate descending, then absolute mistakes
/// descending. Remaining ties fall back to key order so the ranking is stable
/// across runs.
pub fn rank(stats: &KeyStatsStore) -> Vec<WeakKey> {
    let mut keys: Vec<WeakKey> = stats
        .iter()
        .map(|(key, counter)| WeakKey {
            key,
            presses: counter.presses,
            mistakes: counter.mistakes,
            mistake_rate: counter.mistake_rate(),
        })
        .collect();
    keys.sort_by(worst_first);
    keys
}

/// The worst keys that were actually mistyped at least once.
pub fn struggling(stats: &KeyStatsStore) -> Vec<WeakKey> {
    rank(stats)
        .into_iter()
        .filter(|k| k.mistakes > 0)
        .take(TOP_WEAK_KEYS)
        .collect()
}

fn worst_first(a: &WeakKey, b: &WeakKey) -> Ordering {
    b.mistake_rate
        .total_cmp(&a.mistake_rate)
        .then_with(|| b.mistakes.cmp(&a.mistakes))
        .then_with(|| a.key.cmp(&b.key))
}
