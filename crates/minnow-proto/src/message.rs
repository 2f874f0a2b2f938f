//! Outbound message model and wire serialization.

use std::fmt;

use crate::prefix::Prefix;
use crate::response::Response;

/// An outbound IRC message: optional origin prefix plus a command.
///
/// `Display` produces the wire form without the line terminator; the
/// [`crate::line::LineCodec`] encoder appends CRLF.
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    /// Message origin (`:<prefix> `), usually the server name.
    pub prefix: Option<Prefix>,
    /// The command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a numeric reply with its parameters (no prefix).
    pub fn response(response: Response, params: Vec<String>) -> Self {
        Command::Response(response, params).into()
    }

    /// Create a keepalive `PING :<server>`.
    pub fn ping(server: impl Into<String>) -> Self {
        Command::PING(server.into()).into()
    }

    /// Create a `PONG <server> :<token>` answering a client PING.
    pub fn pong(server: impl Into<String>, token: impl Into<String>) -> Self {
        Command::PONG(server.into(), token.into()).into()
    }

    /// Create an `ERROR :<reason>` line, the final diagnostic sent before
    /// a disconnect.
    pub fn error(reason: impl Into<String>) -> Self {
        Command::ERROR(reason.into()).into()
    }

    /// Set the origin prefix of this message.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Message {
        Message {
            prefix: None,
            command,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}", self.command)
    }
}

/// The outbound command shapes this server emits.
#[derive(Clone, PartialEq, Debug)]
pub enum Command {
    /// Numeric server reply with its parameters.
    Response(Response, Vec<String>),
    /// `PING :<server>` - keepalive probe.
    PING(String),
    /// `PONG <server> :<token>` - answer to a client PING.
    PONG(String, String),
    /// `NICK :<nickname>` - rename notification.
    NICK(String),
    /// `ERROR :<reason>` - terminal diagnostic before disconnect.
    ERROR(String),
}

/// A parameter needs the trailing-colon form when it is empty, contains a
/// space, or begins with a colon itself.
fn needs_trailing(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Response(code, params) => {
                write!(f, "{}", code)?;
                if let Some((last, middle)) = params.split_last() {
                    for param in middle {
                        write!(f, " {}", param)?;
                    }
                    if needs_trailing(last) {
                        write!(f, " :{}", last)
                    } else {
                        write!(f, " {}", last)
                    }
                } else {
                    Ok(())
                }
            }
            Command::PING(server) => write!(f, "PING :{}", server),
            Command::PONG(server, token) => write!(f, "PONG {} :{}", server, token),
            Command::NICK(nick) => write!(f, "NICK :{}", nick),
            Command::ERROR(reason) => write!(f, "ERROR :{}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_reply_with_trailing() {
        let msg = Message::response(
            Response::ERR_UNKNOWNCOMMAND,
            vec![
                "alice".to_string(),
                "HELLO".to_string(),
                "Unknown command".to_string(),
            ],
        )
        .with_prefix(Prefix::ServerName("irc.test".to_string()));

        assert_eq!(msg.to_string(), ":irc.test 421 alice HELLO :Unknown command");
    }

    #[test]
    fn test_numeric_reply_without_trailing() {
        let msg = Message::response(
            Response::RPL_MYINFO,
            vec![
                "alice".to_string(),
                "irc.test".to_string(),
                "0.1.0".to_string(),
                "o".to_string(),
                "o".to_string(),
            ],
        )
        .with_prefix(Prefix::ServerName("irc.test".to_string()));

        assert_eq!(msg.to_string(), ":irc.test 004 alice irc.test 0.1.0 o o");
    }

    #[test]
    fn test_rename_notification_uses_user_prefix() {
        let msg = Message::from(Command::NICK("bob".to_string()))
            .with_prefix(Prefix::new("alice", "al", "127.0.0.1"));

        assert_eq!(msg.to_string(), ":alice!al@127.0.0.1 NICK :bob");
    }

    #[test]
    fn test_ping_pong() {
        assert_eq!(Message::ping("irc.test").to_string(), "PING :irc.test");
        assert_eq!(
            Message::pong("irc.test", "abc").to_string(),
            "PONG irc.test :abc"
        );
    }

    #[test]
    fn test_error_line() {
        assert_eq!(
            Message::error("Registration timed out").to_string(),
            "ERROR :Registration timed out"
        );
    }

    #[test]
    fn test_trailing_needed_for_empty_param() {
        let msg = Message::response(Response::RPL_WELCOME, vec!["alice".into(), "".into()]);
        assert_eq!(msg.to_string(), "001 alice :");
    }
}
