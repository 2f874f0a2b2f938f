//! Networking: listener, per-connection tasks, and keepalive scheduling.

mod connection;
mod gateway;
mod keepalive;

pub use connection::Connection;
pub use gateway::Gateway;
pub use keepalive::{KeepaliveAction, KeepaliveTimer};
