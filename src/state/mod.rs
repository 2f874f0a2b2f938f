//! Shared server state and per-connection session state.

mod roster;
mod session;

pub use roster::{Channel, Roster, ServerInfo, MAX_SERVER_NAME_LEN};
pub use session::SessionState;
