//! Registration completion and the welcome burst.

use minnow_proto::Response;
use tracing::info;

use super::super::Context;
use crate::error::{HandlerError, HandlerResult};

/// User modes advertised in RPL_MYINFO.
const USER_MODES: &str = "o";
/// Channel modes advertised in RPL_MYINFO.
const CHANNEL_MODES: &str = "o";

/// Complete registration and send the four-part welcome (001-004).
///
/// Callers must have verified that both nick and user are present.
pub(super) async fn send_welcome(ctx: &mut Context<'_>) -> HandlerResult {
    let nick = ctx
        .state
        .nickname
        .clone()
        .ok_or(HandlerError::NickOrUserMissing)?;
    let user = ctx
        .state
        .username
        .clone()
        .ok_or(HandlerError::NickOrUserMissing)?;

    ctx.state.registered = true;
    ctx.roster.nicks.insert(nick.clone(), ctx.uid.to_string());

    let server_name = ctx.roster.server.name.clone();
    info!(nick = %nick, user = %user, uid = %ctx.uid, "Client registered");

    // 001 RPL_WELCOME
    ctx.send_reply(
        Response::RPL_WELCOME,
        vec![
            nick.clone(),
            format!(
                "Welcome to the Internet Relay Network {}",
                ctx.state.prefix()
            ),
        ],
    )
    .await?;

    // 002 RPL_YOURHOST
    ctx.send_reply(
        Response::RPL_YOURHOST,
        vec![nick.clone(), format!("Your host is {}", server_name)],
    )
    .await?;

    // 003 RPL_CREATED
    let created_at = ctx.roster.server.created_at.format("%b %d %Y at %H:%M:%S");
    ctx.send_reply(
        Response::RPL_CREATED,
        vec![
            nick.clone(),
            format!("This server was created {}", created_at),
        ],
    )
    .await?;

    // 004 RPL_MYINFO
    ctx.send_reply(
        Response::RPL_MYINFO,
        vec![
            nick,
            server_name,
            ctx.roster.server.version.to_string(),
            USER_MODES.to_string(),
            CHANNEL_MODES.to_string(),
        ],
    )
    .await?;

    Ok(())
}
