use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};

use crate::session::result::SessionResult;
use crate::store::HistoryStore;
use crate::store::schema::History;

const HISTORY_FILE: &str = "history.json";

/// History kept as a JSON array in the data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing, unreadable or unparseable files all read as an empty history.
    fn load(&self) -> History {
        let path = self.file_path(HISTORY_FILE);
        if !path.exists() {
            return History::default();
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read history");
                return History::default();
            }
        };
        match serde_json::from_str::<Vec<SessionResult>>(&content) {
            Ok(sessions) => History::from_sessions(sessions),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "history is malformed, starting empty");
                History::default()
            }
        }
    }

    fn save(&self, history: &History) -> Result<()> {
        let path = self.file_path(HISTORY_FILE);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(history)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        debug!(path = %path.display(), sessions = history.len(), "history saved");
        Ok(())
    }
}

impl HistoryStore for JsonStore {
    fn load_history(&self) -> Vec<SessionResult> {
        self.load().into_sessions()
    }

    fn append_history(&mut self, result: SessionResult) -> Result<()> {
        let mut history = self.load();
        history.push(result);
        self.save(&history)
    }
}
