use crate::engine::weak_keys::{TOP_WEAK_KEYS, WeakKey};

pub const NO_WEAK_KEYS: &str = "No weak keys identified yet. Run a typing test first.";

const SEPARATOR: &str = " \u{2022} ";
const INSTRUCTION: &str = "Type this sentence slowly and carefully using your weak keys.";
const REPEAT: usize = 3;

/// Build a remedial drill from ranked weak keys (worst first).
///
/// The drill lists the focus keys, an instruction, and a line where every
/// focus key is repeated three times. The space key is left out. The
/// placeholder is only returned when there is no key data at all; if only
/// spaces were recorded the focus line is dropped and the drill is empty.
pub fn practice_text(ranked: &[WeakKey]) -> String {
    if ranked.is_empty() {
        return NO_WEAK_KEYS.to_string();
    }

    let focus = focus_keys(ranked);
    let drill: Vec<String> = focus
        .iter()
        .map(|&c| std::iter::repeat_n(c, REPEAT).collect())
        .collect();

    let mut parts = Vec::with_capacity(3);
    if !focus.is_empty() {
        let listed: Vec<String> = focus.iter().map(|c| c.to_string()).collect();
        parts.push(format!("Focus on these keys: {}", listed.join(" ")));
    }
    parts.push(INSTRUCTION.to_string());
    parts.push(format!("Triple-key drill: {}", drill.join(" ")));
    parts.join(SEPARATOR)
}

/// True for the text produced when there was nothing to drill.
pub fn is_placeholder(text: &str) -> bool {
    text.trim().is_empty() || text.trim_start().starts_with(NO_WEAK_KEYS)
}

fn focus_keys(ranked: &[WeakKey]) -> Vec<char> {
    let mut keys: Vec<char> = Vec::with_capacity(TOP_WEAK_KEYS);
    for k in ranked.iter().take(TOP_WEAK_KEYS) {
        if k.key != ' ' && !keys.contains(&k.key) {
            keys.push(k.key);
        }
    }
    keys
}
