pub mod json_store;
pub mod schema;

use anyhow::Result;

use crate::session::result::SessionResult;
use crate::store::schema::History;

pub use json_store::JsonStore;
pub use schema::HISTORY_CAPACITY;

/// Where finished sessions are kept between runs.
pub trait HistoryStore {
    /// Stored results, newest first. Never fails: bad data reads as empty.
    fn load_history(&self) -> Vec<SessionResult>;

    /// Prepend `result`, keeping at most `HISTORY_CAPACITY` entries.
    fn append_history(&mut self, result: SessionResult) -> Result<()>;
}

/// Non-persistent store, for tests and for when no data directory is usable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    history: History,
}

impl HistoryStore for MemoryStore {
    fn load_history(&self) -> Vec<SessionResult> {
        self.history.sessions().to_vec()
    }

    fn append_history(&mut self, result: SessionResult) -> Result<()> {
        self.history.push(result);
        Ok(())
    }
}
