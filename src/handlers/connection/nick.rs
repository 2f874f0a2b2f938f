//! NICK command handler.

use async_trait::async_trait;
use minnow_proto::{Command, CommandLine, Message};
use tracing::{debug, info};

use super::super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};

/// Handler for the NICK command.
///
/// The first NICK (pre-registration) is silent. A post-registration NICK
/// is a rename: the notification must carry the prefix the peer knew us
/// by, so it is built before the state change.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, line: &CommandLine<'_>) -> HandlerResult {
        let params = line.params().ok_or(HandlerError::NeedMoreParams)?;
        let new_nick = match params.split_once(' ') {
            Some((first, _)) => first,
            None => params,
        };
        if new_nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        if !ctx.state.registered {
            debug!(nick = %new_nick, uid = %ctx.uid, "Nick set");
            ctx.state.nickname = Some(new_nick.to_string());
            return Ok(());
        }

        let old_prefix = ctx.state.prefix();
        let old_nick = ctx.state.nickname.take();
        info!(old = ?old_nick, new = %new_nick, uid = %ctx.uid, "Nick change");

        let notice = Message {
            prefix: Some(old_prefix),
            command: Command::NICK(new_nick.to_string()),
        };
        ctx.send(notice).await?;

        // Change the nick after queueing the reply so that the prefix
        // shows the old nick.
        ctx.state.nickname = Some(new_nick.to_string());

        // Move the roster mapping to the new nickname.
        if let Some(old) = old_nick {
            ctx.roster.nicks.remove(&old);
        }
        ctx.roster
            .nicks
            .insert(new_nick.to_string(), ctx.uid.to_string());

        Ok(())
    }
}
