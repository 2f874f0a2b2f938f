//! PING, PONG, and QUIT handlers.

use async_trait::async_trait;
use minnow_proto::{CommandLine, Message};
use tracing::info;

use super::super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};

/// Handler for PING: echo the token back as `PONG <server> :<token>`.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, line: &CommandLine<'_>) -> HandlerResult {
        let token = line.params().ok_or(HandlerError::NeedMoreParams)?;
        let token = token.strip_prefix(':').unwrap_or(token);

        let pong = Message::pong(ctx.roster.server.name.clone(), token);
        ctx.send(pong).await
    }
}

/// Handler for PONG: clears the pending keepalive flag.
pub struct PongHandler;

#[async_trait]
impl Handler for PongHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _line: &CommandLine<'_>) -> HandlerResult {
        ctx.state.ping_pending = false;
        Ok(())
    }
}

/// Handler for QUIT: signals the connection loop to close.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &mut Context<'_>, line: &CommandLine<'_>) -> HandlerResult {
        let reason = line
            .params()
            .map(|p| p.strip_prefix(':').unwrap_or(p).to_string());

        info!(uid = %ctx.uid, nick = ?ctx.state.nickname, reason = ?reason, "Client quit");

        Err(HandlerError::Quit(reason))
    }
}
