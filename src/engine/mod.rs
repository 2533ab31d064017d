pub mod analytics;
pub mod key_stats;
pub mod weak_keys;

pub use analytics::Issue;
pub use weak_keys::WeakKey;
