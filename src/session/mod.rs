mod input;
pub mod result;
pub mod state;

pub use result::{SessionReport, SessionResult};
pub use state::{Session, SessionError, SessionState};
