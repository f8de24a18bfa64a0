//! # Settings Command
//!
//! Per-channel key/value settings kept in the router's `settings` storage namespace.
//! `settings get <key>`, `settings set <key> <value>`, `settings prefixes`.

use crate::application::command::Command;
use crate::application::context::Context;
use crate::application::storage::StoredValue;
use crate::strings::{help, messages};
use anyhow::Result;

pub const STORAGE_NAMESPACE: &str = "settings";

pub fn command() -> Command {
    Command::new("settings")
        .alias("config")
        .description("Reads and writes per-channel settings")
        .usage("settings <get|set|prefixes> [key] [value]")
        .example("settings set greeting \"hello there\"")
        .ignore_case(true)
        .handler(handle_usage)
        .sub_command(
            Command::new("get")
                .description("Shows the value of a setting")
                .usage("settings get <key>")
                .example("settings get greeting")
                .handler(handle_get),
        )
        .sub_command(
            Command::new("set")
                .description("Stores a setting; numbers, booleans and JSON keep their type")
                .usage("settings set <key> <value>")
                .example("settings set limit 10")
                .handler(handle_set),
        )
        .sub_command(
            Command::new("prefixes")
                .description("Lists the prefixes the bot listens to")
                .usage("settings prefixes")
                .example("settings prefixes")
                .handler(handle_prefixes),
        )
}

fn setting_key(channel_id: &str, key: &str) -> String {
    format!("{channel_id}:{key}")
}

async fn handle_usage(ctx: Context) -> Result<()> {
    ctx.respond_text(messages::SETTINGS_USAGE).await?;
    Ok(())
}

pub async fn handle_get(ctx: Context) -> Result<()> {
    let key = ctx.args.get(0).raw();
    if key.is_empty() {
        ctx.respond_text(messages::SETTINGS_GET_USAGE).await?;
        return Ok(());
    }

    let store = ctx.router.storage(STORAGE_NAMESPACE).await;
    let reply = match store.get(&setting_key(ctx.channel_id(), key)).await {
        Some(value) => messages::setting_value(key, &value.to_string()),
        None => messages::setting_missing(key),
    };
    ctx.respond_text(&reply).await?;
    Ok(())
}

pub async fn handle_set(ctx: Context) -> Result<()> {
    let value = ctx.args.rest();
    if ctx.args.amount() < 2 || value.is_empty() {
        ctx.respond_text(messages::SETTINGS_SET_USAGE).await?;
        return Ok(());
    }
    let key = ctx.args.get(0).raw();

    // A single quoted token is stored without its quotes.
    let value = if ctx.args.amount() == 2 {
        ctx.args.get(1).raw()
    } else {
        value
    };

    ctx.router
        .storage(STORAGE_NAMESPACE)
        .await
        .set(setting_key(ctx.channel_id(), key), typed_value(value))
        .await;
    tracing::info!("Setting '{}' changed in {}", key, ctx.channel_id());
    ctx.respond_text(&messages::setting_stored(key)).await?;
    Ok(())
}

pub async fn handle_prefixes(ctx: Context) -> Result<()> {
    let list = help::code_list(ctx.router.prefixes(), "none");
    ctx.respond_text(&messages::prefixes(&list)).await?;
    Ok(())
}

fn typed_value(raw: &str) -> StoredValue {
    if let Ok(n) = raw.parse::<i64>() {
        return StoredValue::Int(n);
    }
    match raw {
        "true" | "True" | "TRUE" => return StoredValue::Bool(true),
        "false" | "False" | "FALSE" => return StoredValue::Bool(false),
        _ => {}
    }
    if raw.starts_with(['{', '['])
        && let Ok(json) = serde_json::from_str(raw)
    {
        return StoredValue::Json(json);
    }
    StoredValue::Text(raw.to_string())
}
