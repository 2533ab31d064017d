use rand::Rng;

pub struct Preset {
    pub name: &'static str,
    pub text: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Pangram",
        text: "The quick brown fox jumps over the lazy dog.",
    },
    Preset {
        name: "Home row",
        text: "A sad lad asks dad for a glass of salsa; all fall flat as a flask falls.",
    },
    Preset {
        name: "Dickens",
        text: "It was the best of times, it was the worst of times, it was the age of wisdom, \
               it was the age of foolishness.",
    },
    Preset {
        name: "Austen",
        text: "It is a truth universally acknowledged, that a single man in possession of a good \
               fortune, must be in want of a wife.",
    },
    Preset {
        name: "Melville",
        text: "Call me Ishmael. Some years ago, never mind how long precisely, having little or \
               no money in my purse, I thought I would sail about a little.",
    },
    Preset {
        name: "Thoreau",
        text: "I went to the woods because I wished to live deliberately, to front only the \
               essential facts of life.",
    },
    Preset {
        name: "Numbers",
        text: "Order 42 arrived on 2024-03-15 at 09:30, costing $17.85 for 6 items (3 spare).",
    },
    Preset {
        name: "Code",
        text: "fn main() { let total: u32 = (1..=10).map(|x| x * x).sum(); println!(\"{total}\"); }",
    },
];

/// Preset by zero-based index.
pub fn preset(index: usize) -> Option<&'static Preset> {
    PRESETS.get(index)
}

pub fn random_preset<R: Rng>(rng: &mut R) -> &'static Preset {
    &PRESETS[rng.gen_range(0..PRESETS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_presets_are_usable_targets() {
        assert!(!PRESETS.is_empty());
        for p in PRESETS {
            assert!(!p.text.trim().is_empty(), "{} is blank", p.name);
            assert!(!p.text.contains('\n'));
        }
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset(0).map(|p| p.name), Some("Pangram"));
        assert!(preset(PRESETS.len()).is_none());
    }

    #[test]
    fn test_random_preset_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let p = random_preset(&mut rng);
            assert!(PRESETS.iter().any(|q| q.name == p.name));
        }
    }
}
