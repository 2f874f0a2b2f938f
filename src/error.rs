//! Unified error handling for minnowd.
//!
//! Handler errors either convert to an IRC error reply (the connection
//! stays open) or signal the connection loop to close.

use minnow_proto::{Command, Message, Prefix, Response};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("already registered")]
    AlreadyRegistered,

    #[error("internal error: nick or user missing at registration")]
    NickOrUserMissing,

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Message>),

    #[error("client quit: {0:?}")]
    Quit(Option<String>),
}

impl HandlerError {
    /// Convert to an IRC error reply message.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply
    /// (send failures, quit, internal errors).
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let command = match self {
            Self::NeedMoreParams => Command::Response(
                Response::ERR_NEEDMOREPARAMS,
                vec![
                    nick.to_string(),
                    cmd_name.to_string(),
                    "Not enough parameters".to_string(),
                ],
            ),
            Self::AlreadyRegistered => Command::Response(
                Response::ERR_ALREADYREGISTERED,
                vec![
                    nick.to_string(),
                    "Unauthorized command (already registered)".to_string(),
                ],
            ),

            // These errors don't get client-visible replies
            Self::NickOrUserMissing => return None,
            Self::Send(_) => return None,
            Self::Quit(_) => return None,
        };

        Some(Message {
            prefix: Some(Prefix::ServerName(server_name.to_string())),
            command,
        })
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need_more_params_reply() {
        let reply = HandlerError::NeedMoreParams
            .to_irc_reply("irc.test", "alice", "PING")
            .expect("reply expected");
        assert_eq!(
            reply.to_string(),
            ":irc.test 461 alice PING :Not enough parameters"
        );
    }

    #[test]
    fn test_already_registered_reply() {
        let reply = HandlerError::AlreadyRegistered
            .to_irc_reply("irc.test", "alice", "USER")
            .expect("reply expected");
        assert_eq!(
            reply.to_string(),
            ":irc.test 462 alice :Unauthorized command (already registered)"
        );
    }

    #[test]
    fn test_quit_has_no_reply() {
        let reply = HandlerError::Quit(Some("bye".into())).to_irc_reply("irc.test", "alice", "QUIT");
        assert!(reply.is_none());
    }
}
