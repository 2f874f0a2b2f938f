//! Per-connection session state.

use minnow_proto::Prefix;

/// Identity and liveness state for one client connection.
///
/// Owned exclusively by the connection task: handlers receive `&mut`
/// through the dispatch context, and the keepalive branch runs in the same
/// task, so these fields need no synchronization.
#[derive(Debug)]
pub struct SessionState {
    /// Display name; unset until the first NICK.
    pub nickname: Option<String>,
    /// Supplied by USER.
    pub username: Option<String>,
    /// Supplied by USER (trailing parameter).
    pub realname: Option<String>,
    /// Derived from the peer address at accept time.
    pub hostname: String,
    /// Set true exactly once, when USER completes with a nick present.
    /// Never reverts.
    pub registered: bool,
    /// True between a keepalive PING and the answering PONG.
    pub ping_pending: bool,
}

impl SessionState {
    /// Fresh state for a newly accepted connection.
    pub fn new(hostname: String) -> Self {
        Self {
            nickname: None,
            username: None,
            realname: None,
            hostname,
            registered: false,
            ping_pending: false,
        }
    }

    /// The `nick!user@host` prefix derived from the current field values.
    ///
    /// Always derived, never cached, so a rename is reflected immediately
    /// everywhere except where a handler deliberately captures the prior
    /// value first.
    pub fn prefix(&self) -> Prefix {
        Prefix::new(
            self.nickname.as_deref().unwrap_or("*"),
            self.username.as_deref().unwrap_or("*"),
            self.hostname.as_str(),
        )
    }

    /// The nick to use in numeric replies (`*` before the first NICK).
    pub fn nick_or_star(&self) -> &str {
        self.nickname.as_deref().unwrap_or("*")
    }
}
