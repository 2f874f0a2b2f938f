//! Command handlers: dispatch context, handler trait, and the registry.

mod connection;
mod helpers;
mod registry;

pub use connection::{NickHandler, PingHandler, PongHandler, QuitHandler, UserHandler};
pub use helpers::{err_unknowncommand, server_reply};
pub use registry::Registry;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use minnow_proto::{CommandLine, Message, Response};
use tokio::sync::mpsc;

use crate::error::HandlerResult;
use crate::state::{Roster, SessionState};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Connection uid.
    pub uid: &'a str,
    /// Shared server state.
    pub roster: &'a Arc<Roster>,
    /// Outbound queue for this client.
    pub sender: &'a mpsc::Sender<Message>,
    /// Session state, owned by the connection task.
    pub state: &'a mut SessionState,
    /// Remote address of the client.
    pub remote_addr: SocketAddr,
}

impl Context<'_> {
    /// Queue an already-formed message for this client.
    pub async fn send(&self, msg: Message) -> HandlerResult {
        self.sender.send(msg).await?;
        Ok(())
    }

    /// Build and queue a numeric server reply in one call.
    pub async fn send_reply(&self, response: Response, params: Vec<String>) -> HandlerResult {
        let reply = helpers::server_reply(&self.roster.server.name, response, params);
        self.sender.send(reply).await?;
        Ok(())
    }
}

/// A command handler.
///
/// Handlers re-parse parameters from `line` for the fields they need; side
/// effects go to the session state and the outbound queue on the context.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, line: &CommandLine<'_>) -> HandlerResult;
}
