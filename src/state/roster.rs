//! Shared registries: the composition root's view of every live session.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use minnow_proto::Message;
use tokio::sync::mpsc;

use crate::config::{Config, TimeoutsConfig};

/// Longest server name carried in reply prefixes.
pub const MAX_SERVER_NAME_LEN: usize = 63;

/// Immutable server identity shared by every connection.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Configured name, truncated to [`MAX_SERVER_NAME_LEN`].
    pub name: String,
    /// Startup time, reported in RPL_CREATED.
    pub created_at: DateTime<Utc>,
    /// Version string reported in RPL_MYINFO.
    pub version: &'static str,
}

/// A channel entry.
///
/// Declared for the name-keyed channel registry; no handler in this
/// server's command set touches channels.
#[derive(Debug, Default)]
pub struct Channel {
    /// Channel topic, if one has been set.
    pub topic: Option<String>,
    /// Member connection uids.
    pub members: Vec<String>,
}

/// Shared server state: identity, timeouts, and the session registries.
pub struct Roster {
    /// Server identity.
    pub server: ServerInfo,
    /// Registration/keepalive timeouts, fixed at startup.
    pub timeouts: TimeoutsConfig,
    /// nickname -> connection uid; entries live from registration to
    /// disconnect, moving on rename.
    pub nicks: DashMap<String, String>,
    /// name -> channel registry (unused by the current command set).
    pub channels: DashMap<String, Channel>,
    /// connection uid -> outbound queue; the cross-session send path.
    senders: DashMap<String, mpsc::Sender<Message>>,
    uid_counter: AtomicU64,
}

impl Roster {
    /// Build shared state from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        let name: String = config
            .server
            .name
            .chars()
            .take(MAX_SERVER_NAME_LEN)
            .collect();
        Self {
            server: ServerInfo {
                name,
                created_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION"),
            },
            timeouts: config.timeouts.clone(),
            nicks: DashMap::new(),
            channels: DashMap::new(),
            senders: DashMap::new(),
            uid_counter: AtomicU64::new(0),
        }
    }

    /// Allocate a connection uid.
    pub fn next_uid(&self) -> String {
        format!("c{}", self.uid_counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Register the outbound queue for a connection.
    pub fn register_sender(&self, uid: &str, tx: mpsc::Sender<Message>) {
        self.senders.insert(uid.to_string(), tx);
    }

    /// Remove a connection's outbound queue. Idempotent.
    pub fn unregister_sender(&self, uid: &str) {
        self.senders.remove(uid);
    }

    /// The outbound queue for a connection, if it is still live.
    pub fn sender_for(&self, uid: &str) -> Option<mpsc::Sender<Message>> {
        self.senders.get(uid).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_name_truncated() {
        let mut config = Config::default();
        config.server.name = "x".repeat(100);
        let roster = Roster::new(&config);
        assert_eq!(roster.server.name.len(), MAX_SERVER_NAME_LEN);
    }

    #[test]
    fn test_uids_are_unique() {
        let roster = Roster::new(&Config::default());
        let a = roster.next_uid();
        let b = roster.next_uid();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_sender_registration_roundtrip() {
        let roster = Roster::new(&Config::default());
        let (tx, mut rx) = mpsc::channel(1);
        roster.register_sender("c1", tx);

        let sender = roster.sender_for("c1").expect("sender registered");
        sender.send(Message::ping("irc.test")).await.unwrap();
        assert!(rx.recv().await.is_some());

        roster.unregister_sender("c1");
        assert!(roster.sender_for("c1").is_none());
        // Removing again is a no-op
        roster.unregister_sender("c1");
    }
}
