//! Connection and registration command handlers.

mod nick;
mod ping;
mod user;
mod welcome;

pub use nick::NickHandler;
pub use ping::{PingHandler, PongHandler, QuitHandler};
pub use user::UserHandler;
