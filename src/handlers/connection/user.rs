//! USER command handler.

use async_trait::async_trait;
use minnow_proto::CommandLine;
use tracing::debug;

use super::super::{Context, Handler};
use super::welcome::send_welcome;
use crate::error::{HandlerError, HandlerResult};

/// Handler for the USER command: `USER <username> <mode> <unused> :<realname>`.
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, line: &CommandLine<'_>) -> HandlerResult {
        if ctx.state.registered {
            return Err(HandlerError::AlreadyRegistered);
        }

        let params = line.params().ok_or(HandlerError::NeedMoreParams)?;
        let username = match params.split_once(' ') {
            Some((first, _)) => first,
            None => params,
        };
        // Realname is the trailing parameter; without a colon, fall back
        // to the last space-separated token.
        let realname = match params.rsplit_once(':') {
            Some((_, trailing)) => trailing,
            None => params.rsplit(' ').next().unwrap_or(""),
        };

        if username.is_empty() || realname.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        ctx.state.username = Some(username.to_string());
        ctx.state.realname = Some(realname.to_string());
        debug!(user = %username, realname = %realname, uid = %ctx.uid, "User set");

        // Registration transitions only on a USER command with a nick
        // already present.
        if ctx.state.nickname.is_some() {
            send_welcome(ctx).await?;
        }

        Ok(())
    }
}
