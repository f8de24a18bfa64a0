//! # Miscellaneous Commands
//!
//! Handles `ping`, `echo`, `whois` and `code`.
//! Small commands that exercise the argument helpers.

use crate::application::command::Command;
use crate::application::context::Context;
use crate::strings::messages;
use anyhow::Result;

pub fn commands() -> Vec<Command> {
    vec![
        Command::new("ping")
            .description("Checks that the bot is alive")
            .usage("ping")
            .example("ping")
            .ignore_case(true)
            .handler(handle_ping),
        Command::new("echo")
            .alias("say")
            .description("Repeats the given text")
            .usage("echo <text>")
            .example("echo hello world")
            .handler(handle_echo),
        Command::new("whois")
            .description("Shows the ID of a mentioned user")
            .usage("whois <@user>")
            .example("whois <@1234>")
            .handler(handle_whois),
        Command::new("code")
            .description("Reads a code block and reports its language and size")
            .usage("code ```lang\\n...```")
            .example("code ```rust\\nfn main() {}```")
            .handler(handle_code),
    ]
}

pub async fn handle_ping(ctx: Context) -> Result<()> {
    ctx.respond_text(messages::PONG).await?;
    Ok(())
}

pub async fn handle_echo(ctx: Context) -> Result<()> {
    let text = if ctx.args.is_empty() {
        messages::ECHO_USAGE
    } else {
        ctx.args.raw().trim()
    };
    ctx.respond_text(text).await?;
    Ok(())
}

pub async fn handle_whois(ctx: Context) -> Result<()> {
    let user_id = ctx.args.get(0).as_user_mention_id();
    if user_id.is_empty() {
        ctx.respond_text(messages::WHOIS_USAGE).await?;
        return Ok(());
    }
    ctx.respond_text(&messages::whois(user_id)).await?;
    Ok(())
}

pub async fn handle_code(ctx: Context) -> Result<()> {
    let Some(block) = ctx.args.as_codeblock() else {
        ctx.respond_text(messages::CODE_USAGE).await?;
        return Ok(());
    };
    let lines = block.content.lines().count();
    ctx.respond_text(&messages::code_summary(&block.language, lines))
        .await?;
    Ok(())
}
