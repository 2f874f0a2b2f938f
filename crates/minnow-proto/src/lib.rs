//! # minnow-proto
//!
//! Protocol primitives for the minnow IRC daemon: line framing over a byte
//! stream, command/parameter splitting, and serialization of the server's
//! outbound messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use minnow_proto::{CommandLine, Message, Prefix, Response};
//!
//! // Split an inbound line into command and parameters
//! let line = CommandLine::new("NICK alice");
//! assert_eq!(line.command(), "NICK");
//! assert_eq!(line.params(), Some("alice"));
//!
//! // Build an outbound numeric reply
//! let reply = Message::response(
//!     Response::ERR_UNKNOWNCOMMAND,
//!     vec!["alice".into(), "HELLO".into(), "Unknown command".into()],
//! )
//! .with_prefix(Prefix::ServerName("irc.example.com".into()));
//! assert_eq!(reply.to_string(), ":irc.example.com 421 alice HELLO :Unknown command");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;

pub use self::command::CommandLine;
pub use self::error::{ProtocolError, Utf8LineError};
pub use self::line::{InboundLine, LineCodec};
pub use self::message::{Command, Message};
pub use self::prefix::Prefix;
pub use self::response::Response;
