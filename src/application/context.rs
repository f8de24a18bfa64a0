//! # Invocation Context
//!
//! Per-dispatch bundle handed to middleware and handlers: the triggering event,
//! the arguments at the current routing depth, the matched command, and handles
//! back to the router and the chat gateway.

use crate::application::arguments::Arguments;
use crate::application::command::Command;
use crate::application::router::Router;
use crate::domain::traits::ChatProvider;
use crate::domain::types::{Embed, MessageEvent};
use anyhow::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct Context {
    pub event: Arc<MessageEvent>,
    pub args: Arguments,
    /// `None` for middleware and the mention handler.
    pub command: Option<Arc<Command>>,
    pub router: Router,
    pub chat: Arc<dyn ChatProvider>,
}

impl Context {
    pub fn new(
        event: Arc<MessageEvent>,
        args: Arguments,
        command: Option<Arc<Command>>,
        router: Router,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            event,
            args,
            command,
            router,
            chat,
        }
    }

    /// A fresh context one level deeper in the command tree.
    pub(crate) fn descend(&self, command: Arc<Command>, args: Arguments) -> Self {
        Self {
            event: self.event.clone(),
            args,
            command: Some(command),
            router: self.router.clone(),
            chat: self.chat.clone(),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.event.channel_id
    }

    pub fn author_id(&self) -> &str {
        &self.event.author_id
    }

    /// Reply with plain text in the triggering channel.
    pub async fn respond_text(&self, text: &str) -> Result<String> {
        self.chat.send_text(self.channel_id(), text).await
    }

    pub async fn respond_embed(&self, embed: &Embed) -> Result<String> {
        self.chat.send_embed(self.channel_id(), None, embed).await
    }

    pub async fn respond_text_embed(&self, text: &str, embed: &Embed) -> Result<String> {
        self.chat.send_embed(self.channel_id(), Some(text), embed).await
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("event", &self.event)
            .field("args", &self.args)
            .field("command", &self.command.as_ref().map(|c| c.name()))
            .finish_non_exhaustive()
    }
}
