//! # Help Command
//!
//! Handles the `help` command and the reaction pager attached to its output.
//!
//! `help` alone sends a paged list of top-level commands and reacts with
//! ⬅ ❌ ➡. The page each user is on is kept in the [`STORAGE_NAMESPACE`]
//! namespace under `channel:message:user`, so only the user who asked can page.
//! `help a b` shows details for sub-command `b` of `a`.

use crate::application::command::Command;
use crate::application::context::Context;
use crate::application::router::Router;
use crate::domain::traits::ChatProvider;
use crate::domain::types::{Embed, EmbedField, ReactionEvent};
use crate::strings::help;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const STORAGE_NAMESPACE: &str = "hdl_helpMessages";
pub const COMMANDS_PER_PAGE: usize = 5;

pub const PREVIOUS: &str = "⬅";
pub const CLOSE: &str = "❌";
pub const NEXT: &str = "➡";

pub fn command() -> Command {
    Command::new(help::NAME)
        .description(help::DESCRIPTION)
        .usage(help::USAGE)
        .example(help::EXAMPLE)
        .ignore_case(true)
        .handler(handle_help)
}

pub fn pager_key(channel_id: &str, message_id: &str, user_id: &str) -> String {
    format!("{channel_id}:{message_id}:{user_id}")
}

pub async fn handle_help(ctx: Context) -> Result<()> {
    if !ctx.args.is_empty() {
        return handle_specific_help(ctx).await;
    }

    let (embed, page) = render_command_list(&ctx.router, 1, Utc::now());
    let message_id = ctx.respond_embed(&embed).await?;

    for emoji in [PREVIOUS, CLOSE, NEXT] {
        if let Err(e) = ctx.chat.add_reaction(ctx.channel_id(), &message_id, emoji).await {
            tracing::warn!("Failed to add {} to help message {}: {:#}", emoji, message_id, e);
        }
    }

    ctx.router
        .storage(STORAGE_NAMESPACE)
        .await
        .set(
            pager_key(ctx.channel_id(), &message_id, ctx.author_id()),
            page as i64,
        )
        .await;
    Ok(())
}

async fn handle_specific_help(ctx: Context) -> Result<()> {
    let path: Vec<&str> = ctx.args.iter().map(|arg| arg.raw()).collect();
    let prefix = primary_prefix(&ctx.router);

    let embed = match ctx.router.resolve_path(&path) {
        Some(command) => render_command_info(&command, prefix, Utc::now()),
        None => render_unknown_command(prefix, Utc::now()),
    };
    ctx.respond_embed(&embed).await?;
    Ok(())
}

/// React to a pager emoji on a help message. Anything that is not a tracked
/// help message, or that comes from the bot itself, is ignored.
pub async fn handle_reaction(
    router: &Router,
    chat: Arc<dyn ChatProvider>,
    event: &ReactionEvent,
) -> Result<()> {
    if chat.current_user_id().as_deref() == Some(event.user_id.as_str()) {
        return Ok(());
    }
    let Some(store) = router.existing_storage(STORAGE_NAMESPACE).await else {
        return Ok(());
    };

    let key = pager_key(&event.channel_id, &event.message_id, &event.user_id);
    let Some(page) = store.get_int(&key).await? else {
        return Ok(());
    };
    if page <= 0 {
        return Ok(());
    }
    let page = page as usize;

    let requested = match event.emoji.as_str() {
        PREVIOUS => page - 1,
        NEXT => page + 1,
        CLOSE => {
            chat.delete_message(&event.channel_id, &event.message_id).await?;
            store.delete(&key).await;
            tracing::debug!("Closed help message {}", event.message_id);
            return Ok(());
        }
        _ => return Ok(()),
    };

    let (embed, page) = render_command_list(router, requested, Utc::now());
    chat.edit_embed(&event.channel_id, &event.message_id, &embed)
        .await?;
    if let Err(e) = chat
        .remove_user_reaction(&event.channel_id, &event.message_id, &event.emoji, &event.user_id)
        .await
    {
        tracing::warn!("Failed to remove pager reaction: {:#}", e);
    }
    store.set(key, page as i64).await;
    Ok(())
}

/// One page of the top-level command list. `page` is clamped into range and
/// the page actually rendered is returned alongside the embed.
pub fn render_command_list(router: &Router, page: usize, now: DateTime<Utc>) -> (Embed, usize) {
    let commands = router.commands();
    let pages = commands.len().div_ceil(COMMANDS_PER_PAGE).max(1);
    let page = page.clamp(1, pages);

    let fields = commands
        .iter()
        .skip((page - 1) * COMMANDS_PER_PAGE)
        .take(COMMANDS_PER_PAGE)
        .map(|cmd| EmbedField::new(cmd.name(), format!("`{}`", cmd.description_text())))
        .collect();

    let embed = Embed {
        title: help::list_title(page, pages),
        description: help::list_description(primary_prefix(router)),
        color: help::LIST_COLOR,
        fields,
        timestamp: Some(now),
    };
    (embed, page)
}

pub fn render_command_info(command: &Command, prefix: &str, now: DateTime<Utc>) -> Embed {
    let sub_commands: Vec<&str> = command.sub_commands().iter().map(|c| c.name()).collect();

    Embed {
        title: help::INFO_TITLE.to_string(),
        description: help::info_description(command.name()),
        color: help::LIST_COLOR,
        fields: vec![
            EmbedField::new(help::FIELD_NAME, format!("`{}`", command.name())),
            EmbedField::new(
                help::FIELD_SUB_COMMANDS,
                help::code_list(&sub_commands, help::NO_SUB_COMMANDS),
            ),
            EmbedField::new(
                help::FIELD_ALIASES,
                help::code_list(command.alias_list(), help::NO_ALIASES),
            ),
            EmbedField::new(
                help::FIELD_DESCRIPTION,
                help::code_block(command.description_text()),
            ),
            EmbedField::new(
                help::FIELD_USAGE,
                help::code_block(&format!("{prefix}{}", command.usage_text())),
            ),
            EmbedField::new(
                help::FIELD_EXAMPLE,
                help::code_block(&format!("{prefix}{}", command.example_text())),
            ),
        ],
        timestamp: Some(now),
    }
}

pub fn render_unknown_command(prefix: &str, now: DateTime<Utc>) -> Embed {
    Embed {
        title: help::ERROR_TITLE.to_string(),
        description: String::new(),
        color: help::ERROR_COLOR,
        fields: vec![EmbedField::new(help::FIELD_MESSAGE, help::unknown_command(prefix))],
        timestamp: Some(now),
    }
}

fn primary_prefix(router: &Router) -> &str {
    router.prefixes().first().map(String::as_str).unwrap_or_default()
}
