//! # Middleware & Mention Handler
//!
//! Callbacks registered on the router itself rather than on a command.

use crate::application::context::Context;
use crate::strings::messages;
use anyhow::Result;

/// Writes every prefixed message to the `audit` log target.
pub async fn audit(ctx: Context) -> Result<()> {
    tracing::info!(
        target: "audit",
        "{} in {}: {}",
        ctx.author_id(),
        ctx.channel_id(),
        ctx.args.raw()
    );
    Ok(())
}

/// Replies to a bare mention of the bot with its primary prefix.
pub async fn mention(ctx: Context) -> Result<()> {
    let prefix = ctx
        .router
        .prefixes()
        .first()
        .map(String::as_str)
        .unwrap_or_default();
    ctx.respond_text(&messages::mention_reply(prefix)).await?;
    Ok(())
}
