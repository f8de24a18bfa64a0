//! # Command Router
//!
//! Routes incoming messages to the matching command handlers.
//! It strips the configured prefix, runs middleware, matches top-level commands
//! by name or alias and hands the remaining text to the command tree.
//!
//! The router is built once through [`RouterBuilder`] and is immutable afterwards;
//! clones are cheap handles onto the same tree and storage.

use crate::application::arguments::Arguments;
use crate::application::command::{Command, resolve_child, validate_siblings};
use crate::application::context::Context;
use crate::application::handler::{Handler, Middleware};
use crate::application::matching::strip_any_prefix;
use crate::application::storage::{ObjectStore, Storage};
use crate::domain::config::RouterConfig;
use crate::domain::error::BuildError;
use crate::domain::traits::ChatProvider;
use crate::domain::types::MessageEvent;
use std::sync::Arc;

/// Characters that may follow a command name.
const SEPARATORS: [&str; 2] = [" ", "\n"];

#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    prefixes: Vec<String>,
    ignore_prefix_case: bool,
    bots_allowed: bool,
    first_match_only: bool,
    commands: Vec<Arc<Command>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    mention_handler: Option<Arc<dyn Handler>>,
    storage: Storage,
}

#[derive(Default)]
pub struct RouterBuilder {
    prefixes: Vec<String>,
    ignore_prefix_case: bool,
    bots_allowed: bool,
    first_match_only: bool,
    commands: Vec<Arc<Command>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    mention_handler: Option<Arc<dyn Handler>>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `router` section of the config file.
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            prefixes: config.prefixes.clone(),
            ignore_prefix_case: config.ignore_prefix_case,
            bots_allowed: config.bots_allowed,
            first_match_only: config.first_match_only,
            ..Self::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn ignore_prefix_case(mut self, ignore: bool) -> Self {
        self.ignore_prefix_case = ignore;
        self
    }

    pub fn bots_allowed(mut self, allowed: bool) -> Self {
        self.bots_allowed = allowed;
        self
    }

    pub fn first_match_only(mut self, first_only: bool) -> Self {
        self.first_match_only = first_only;
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(Arc::new(command));
        self
    }

    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Handler for a message consisting only of a mention of the bot.
    pub fn mention_handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.mention_handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<Router, BuildError> {
        if !self.prefixes.iter().any(|p| !p.is_empty()) {
            return Err(BuildError::NoPrefixes);
        }
        validate_siblings(&self.commands)?;

        let prefixes = self.prefixes.into_iter().filter(|p| !p.is_empty()).collect();
        Ok(Router {
            inner: Arc::new(RouterInner {
                prefixes,
                ignore_prefix_case: self.ignore_prefix_case,
                bots_allowed: self.bots_allowed,
                first_match_only: self.first_match_only,
                commands: self.commands,
                middlewares: self.middlewares,
                mention_handler: self.mention_handler,
                storage: Storage::new(),
            }),
        })
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.inner.prefixes
    }

    /// Top-level commands in registration order.
    pub fn commands(&self) -> &[Arc<Command>] {
        &self.inner.commands
    }

    /// Look up a top-level command by name or alias.
    pub fn command(&self, name: &str) -> Option<Arc<Command>> {
        resolve_child(&self.inner.commands, name)
    }

    /// Follow `path` (top-level name, then sub-command names) down the tree.
    pub fn resolve_path<S: AsRef<str>>(&self, path: &[S]) -> Option<Arc<Command>> {
        let (first, rest) = path.split_first()?;
        rest.iter().try_fold(self.command(first.as_ref())?, |node, name| {
            node.sub_command_named(name.as_ref())
        })
    }

    /// The storage namespace `name`, created on first use.
    pub async fn storage(&self, name: &str) -> Arc<ObjectStore> {
        self.inner.storage.namespace(name).await
    }

    /// The storage namespace `name` if anything created it already.
    pub async fn existing_storage(&self, name: &str) -> Option<Arc<ObjectStore>> {
        self.inner.storage.existing(name).await
    }

    /// Handle one inbound message. Outcomes are logged, never returned.
    pub async fn dispatch(&self, chat: Arc<dyn ChatProvider>, event: MessageEvent) {
        if event.author_is_bot && !self.inner.bots_allowed {
            tracing::debug!("Ignoring message from bot {}", event.author_id);
            return;
        }
        let event = Arc::new(event);

        if let Some(handler) = &self.inner.mention_handler
            && let Some(bot_id) = chat.current_user_id()
            && is_direct_mention(event.content.trim(), &bot_id)
        {
            tracing::info!("Bot mentioned by {}", event.author_id);
            let ctx = Context::new(event.clone(), Arguments::default(), None, self.clone(), chat);
            if let Err(e) = handler.handle(ctx).await {
                tracing::error!("Mention handler failed: {:#}", e);
            }
            return;
        }

        let Some(content) = strip_any_prefix(
            &event.content,
            &self.inner.prefixes,
            self.inner.ignore_prefix_case,
        ) else {
            tracing::debug!("No prefix in message {}", event.message_id);
            return;
        };
        let content = content.trim_matches(' ');
        if content.is_empty() {
            tracing::debug!("Empty command in message {}", event.message_id);
            return;
        }

        let (cmd_preview, args_preview) = content.split_once(' ').unwrap_or((content, ""));
        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd_preview,
            args_preview,
            event.author_id
        );

        for middleware in &self.inner.middlewares {
            let ctx = Context::new(
                event.clone(),
                Arguments::parse(content),
                None,
                self.clone(),
                chat.clone(),
            );
            if let Err(e) = middleware.trigger(ctx).await {
                tracing::error!("Middleware failed: {:#}", e);
            }
        }

        // Every matching top-level command runs unless `first_match_only` is set.
        for command in &self.inner.commands {
            let Some(rest) = match_command(content, command) else {
                continue;
            };
            let ctx = Context::new(
                event.clone(),
                Arguments::parse(rest),
                Some(command.clone()),
                self.clone(),
                chat.clone(),
            );
            command.trigger(ctx).await;

            if self.inner.first_match_only {
                break;
            }
        }
    }
}

/// If `content` starts with one of `command`'s candidates followed by a separator
/// or the end of input, return the text after the separator.
fn match_command<'a>(content: &'a str, command: &Command) -> Option<&'a str> {
    let candidates = command.candidates();
    let rest = strip_any_prefix(content, &candidates, command.is_case_insensitive())?;
    if rest.is_empty() {
        return Some(rest);
    }
    strip_any_prefix(rest, &SEPARATORS, false)
}

fn is_direct_mention(content: &str, bot_id: &str) -> bool {
    content == format!("<@{bot_id}>") || content == format!("<@!{bot_id}>")
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("prefixes", &self.inner.prefixes)
            .field("commands", &self.inner.commands)
            .field("middlewares", &self.inner.middlewares.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{BOT_ID, RecordingChat, Recorder, message};

    fn router(rec: &Recorder, commands: Vec<Command>) -> RouterBuilder {
        let mut builder = Router::builder().prefix("!");
        for command in commands {
            builder = builder.command(command);
        }
        builder.mention_handler(rec.handler("mention"))
    }

    async fn send(router: &Router, content: &str) {
        router.dispatch(RecordingChat::shared(), message(content)).await;
    }

    #[tokio::test]
    async fn test_longest_match_top_level() {
        let rec = Recorder::default();
        let r = router(
            &rec,
            vec![
                Command::new("h").handler(rec.handler("h")),
                Command::new("help").handler(rec.handler("help")),
            ],
        )
        .build()
        .unwrap();

        send(&r, "!help topic").await;
        send(&r, "!h topic").await;
        assert_eq!(rec.labels(), vec!["help", "h"]);
        assert_eq!(r.command("help").unwrap().name(), "help");
    }

    #[tokio::test]
    async fn test_requires_separator_after_command() {
        let rec = Recorder::default();
        let r = router(&rec, vec![Command::new("help").handler(rec.handler("help"))])
            .build()
            .unwrap();

        send(&r, "!helpfoo").await;
        assert!(rec.calls().is_empty());

        send(&r, "!help").await;
        send(&r, "!help\nmore").await;
        assert_eq!(
            rec.calls(),
            vec![
                ("help".to_string(), "".to_string()),
                ("help".to_string(), "more".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_case_insensitive_command() {
        let rec = Recorder::default();
        let r = router(
            &rec,
            vec![
                Command::new("HELP").ignore_case(true).handler(rec.handler("HELP")),
                Command::new("Ping").handler(rec.handler("Ping")),
            ],
        )
        .build()
        .unwrap();

        send(&r, "!help").await;
        send(&r, "!ping").await;
        send(&r, "!Ping").await;
        assert_eq!(rec.labels(), vec!["HELP", "Ping"]);
    }

    #[tokio::test]
    async fn test_prefix_rules() {
        let rec = Recorder::default();
        let r = Router::builder()
            .prefix("bot ")
            .prefix("!")
            .ignore_prefix_case(true)
            .command(Command::new("ping").handler(rec.handler("ping")))
            .build()
            .unwrap();

        send(&r, "BOT ping").await;
        send(&r, "!ping").await;
        send(&r, "ping").await;
        send(&r, "!   ").await;
        assert_eq!(rec.labels(), vec!["ping", "ping"]);
    }

    #[tokio::test]
    async fn test_bot_messages() {
        let rec = Recorder::default();
        let commands = || vec![Command::new("ping").handler(rec.handler("ping"))];
        let mut event = message("!ping");
        event.author_is_bot = true;

        let blocked = router(&rec, commands()).build().unwrap();
        blocked.dispatch(RecordingChat::shared(), event.clone()).await;
        assert!(rec.calls().is_empty());

        let allowed = router(&rec, commands()).bots_allowed(true).build().unwrap();
        allowed.dispatch(RecordingChat::shared(), event).await;
        assert_eq!(rec.labels(), vec!["ping"]);
    }

    #[tokio::test]
    async fn test_mention_handler_excludes_commands() {
        let rec = Recorder::default();
        let r = Router::builder()
            .prefix(format!("<@{BOT_ID}>"))
            .command(Command::new("ping").handler(rec.handler("ping")))
            .mention_handler(rec.handler("mention"))
            .build()
            .unwrap();

        send(&r, &format!("  <@{BOT_ID}> ")).await;
        send(&r, &format!("<@!{BOT_ID}>")).await;
        send(&r, &format!("<@{BOT_ID}> ping")).await;
        assert_eq!(rec.labels(), vec!["mention", "mention", "ping"]);
    }

    #[tokio::test]
    async fn test_all_matching_top_level_commands_run() {
        let rec = Recorder::default();
        let commands = || {
            vec![
                Command::new("stats").alias("s").handler(rec.handler("stats")),
                Command::new("S").ignore_case(true).handler(rec.handler("S")),
            ]
        };

        // Validation rejects the overlap, so build the inner router by hand.
        assert!(router(&rec, commands()).build().is_err());
        let r = unchecked(commands(), false);
        send(&r, "!s now").await;
        assert_eq!(rec.labels(), vec!["stats", "S"]);

        let rec2 = Recorder::default();
        let r = unchecked(
            vec![
                Command::new("stats").alias("s").handler(rec2.handler("stats")),
                Command::new("S").ignore_case(true).handler(rec2.handler("S")),
            ],
            true,
        );
        send(&r, "!s now").await;
        assert_eq!(rec2.labels(), vec!["stats"]);
    }

    fn unchecked(commands: Vec<Command>, first_match_only: bool) -> Router {
        Router {
            inner: Arc::new(RouterInner {
                prefixes: vec!["!".to_string()],
                ignore_prefix_case: false,
                bots_allowed: false,
                first_match_only,
                commands: commands.into_iter().map(Arc::new).collect(),
                middlewares: Vec::new(),
                mention_handler: None,
                storage: Storage::new(),
            }),
        }
    }

    #[tokio::test]
    async fn test_middleware_runs_in_order_before_commands() {
        let rec = Recorder::default();
        let r = Router::builder()
            .prefix("!")
            .middleware(rec.middleware("first"))
            .middleware(rec.middleware("second"))
            .command(Command::new("ping").handler(rec.handler("ping")))
            .build()
            .unwrap();

        send(&r, "!ping a").await;
        send(&r, "no prefix").await;
        assert_eq!(
            rec.calls(),
            vec![
                ("first".to_string(), "ping a".to_string()),
                ("second".to_string(), "ping a".to_string()),
                ("ping".to_string(), "a".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_sub_commands_through_router() {
        let rec = Recorder::default();
        let r = router(
            &rec,
            vec![
                Command::new("settings")
                    .handler(rec.handler("settings"))
                    .sub_command(Command::new("set").handler(rec.handler("set"))),
            ],
        )
        .build()
        .unwrap();

        send(&r, r#"!settings set greeting "hi there""#).await;
        send(&r, "!settings sett x").await;
        assert_eq!(
            rec.calls(),
            vec![
                ("set".to_string(), r#"greeting "hi there""#.to_string()),
                ("settings".to_string(), "sett x".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_handler_error_is_contained() {
        let r = Router::builder()
            .prefix("!")
            .command(
                Command::new("fail")
                    .handler(|_ctx: Context| async { Err::<(), _>(anyhow::anyhow!("boom")) }),
            )
            .build()
            .unwrap();
        send(&r, "!fail").await;
    }

    #[test]
    fn test_build_validation() {
        assert_eq!(Router::builder().build().unwrap_err(), BuildError::NoPrefixes);
        assert_eq!(
            Router::builder().prefix("").build().unwrap_err(),
            BuildError::NoPrefixes
        );
        assert!(matches!(
            Router::builder().prefix("!").command(Command::new("bare")).build(),
            Err(BuildError::MissingHandler { .. })
        ));
    }

    #[test]
    fn test_resolve_path() {
        let leaf = |n: &str| Command::new(n).handler(|_ctx: Context| async { anyhow::Ok(()) });
        let r = Router::builder()
            .prefix("!")
            .command(Command::new("a").sub_command(Command::new("b").sub_command(leaf("c"))))
            .command(leaf("d"))
            .build()
            .unwrap();

        assert_eq!(r.resolve_path(&["a", "b", "c"]).unwrap().name(), "c");
        assert_eq!(r.resolve_path(&["d"]).unwrap().name(), "d");
        assert!(r.resolve_path(&["a", "x"]).is_none());
        assert!(r.resolve_path::<&str>(&[]).is_none());
    }

    #[tokio::test]
    async fn test_storage_through_router() {
        let r = Router::builder().prefix("!").build().unwrap();
        assert!(r.existing_storage("x").await.is_none());
        r.storage("x").await.set("k", 1_i64).await;
        let clone = r.clone();
        assert_eq!(
            clone.existing_storage("x").await.unwrap().get_int("k").await.unwrap(),
            Some(1)
        );
    }
}
