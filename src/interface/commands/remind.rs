//! # Remind Command
//!
//! `remind <duration> <text>` replies in the same channel once the duration
//! has elapsed. Reminders live in a spawned task and do not survive a restart.

use crate::application::command::Command;
use crate::application::context::Context;
use crate::application::duration::format_duration;
use crate::strings::messages;
use anyhow::Result;
use chrono::TimeDelta;

pub fn command() -> Command {
    Command::new("remind")
        .alias("remindme")
        .description("Sends a reminder after the given duration")
        .usage("remind <duration> <text>")
        .example("remind 1h30m check the oven")
        .handler(handle_remind)
}

pub async fn handle_remind(ctx: Context) -> Result<()> {
    let text = ctx.args.rest();
    if ctx.args.amount() < 2 || text.is_empty() {
        ctx.respond_text(messages::REMIND_USAGE).await?;
        return Ok(());
    }

    let delay = match ctx.args.get(0).as_duration() {
        Ok(delay) => delay,
        Err(e) => {
            ctx.respond_text(&messages::invalid_argument(&e.to_string()))
                .await?;
            return Ok(());
        }
    };
    if delay <= TimeDelta::zero() {
        ctx.respond_text(messages::REMIND_IN_PAST).await?;
        return Ok(());
    }

    let sleep_for = delay.to_std()?;
    let reply = messages::remind_fire(ctx.author_id(), text);
    ctx.respond_text(&messages::remind_scheduled(&format_duration(delay)))
        .await?;

    let chat = ctx.chat.clone();
    let channel_id = ctx.channel_id().to_string();
    tokio::spawn(async move {
        tokio::time::sleep(sleep_for).await;
        if let Err(e) = chat.send_text(&channel_id, &reply).await {
            tracing::error!("Failed to deliver reminder to {}: {:#}", channel_id, e);
        }
    });
    Ok(())
}
