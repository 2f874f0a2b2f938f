//! Reply builders shared across handlers.

use minnow_proto::{Command, Message, Prefix, Response};

/// Helper to create a server reply message (numeric response).
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    Message {
        prefix: Some(Prefix::ServerName(server_name.to_string())),
        command: Command::Response(response, params),
    }
}

/// Create ERR_UNKNOWNCOMMAND reply (421) - unknown command.
///
/// Echoes the command token as the client sent it.
pub fn err_unknowncommand(server_name: &str, nick: &str, command: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_UNKNOWNCOMMAND,
        vec![
            nick.to_string(),
            command.to_string(),
            "Unknown command".to_string(),
        ],
    )
}
