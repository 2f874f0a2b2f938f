//! Command handler registry and dispatch.

use std::collections::HashMap;

use minnow_proto::CommandLine;
use tracing::debug;

use super::{err_unknowncommand, Context, Handler};
use crate::error::HandlerResult;

/// Registry of command handlers, built once at startup.
///
/// Dispatch is a single map lookup on the lower-cased command token; there
/// is no precedence among commands.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection/registration handlers
        handlers.insert("nick", Box::new(super::NickHandler));
        handlers.insert("user", Box::new(super::UserHandler));
        handlers.insert("ping", Box::new(super::PingHandler));
        handlers.insert("pong", Box::new(super::PongHandler));
        handlers.insert("quit", Box::new(super::QuitHandler));

        Self { handlers }
    }

    /// The registered command names, for diagnostics.
    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch one framed line to its handler.
    ///
    /// Unrecognized commands are answered with ERR_UNKNOWNCOMMAND echoing
    /// the token in its original case.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, line: &CommandLine<'_>) -> HandlerResult {
        let token = line.command();
        let cmd_name = token.to_ascii_lowercase();

        if let Some(handler) = self.handlers.get(cmd_name.as_str()) {
            debug!(command = %cmd_name, uid = %ctx.uid, "Dispatching command");
            handler.handle(ctx, line).await
        } else {
            let nick = ctx.state.nick_or_star().to_string();
            let reply = err_unknowncommand(&ctx.roster.server.name, &nick, token);
            ctx.send(reply).await
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
