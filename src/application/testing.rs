//! Test doubles shared by the unit tests.

use crate::application::arguments::Arguments;
use crate::application::command::Command;
use crate::application::context::Context;
use crate::application::handler::{Handler, Middleware};
use crate::application::router::Router;
use crate::domain::traits::ChatProvider;
use crate::domain::types::{Embed, MessageEvent, ReactionEvent};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BOT_ID: &str = "1000";
pub const CHANNEL: &str = "!room:test";
pub const AUTHOR: &str = "42";

pub fn message(content: &str) -> MessageEvent {
    MessageEvent {
        content: content.to_string(),
        author_id: AUTHOR.to_string(),
        author_is_bot: false,
        channel_id: CHANNEL.to_string(),
        message_id: "$trigger".to_string(),
    }
}

pub fn reaction(message_id: &str, user_id: &str, emoji: &str) -> ReactionEvent {
    ReactionEvent {
        channel_id: CHANNEL.to_string(),
        message_id: message_id.to_string(),
        user_id: user_id.to_string(),
        emoji: emoji.to_string(),
    }
}

/// Context for invoking `command` directly with `raw` as its arguments.
pub fn context_for(command: Arc<Command>, raw: &str) -> Context {
    let router = Router::builder().prefix("!").build().unwrap();
    Context::new(
        Arc::new(message(raw)),
        Arguments::parse(raw),
        Some(command),
        router,
        RecordingChat::shared(),
    )
}

/// Records which labelled callback ran and with what raw arguments.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl Recorder {
    pub fn handler(&self, label: &str) -> impl Handler + use<> {
        self.callback(label)
    }

    pub fn middleware(&self, label: &str) -> impl Middleware + use<> {
        self.callback(label)
    }

    fn callback(
        &self,
        label: &str,
    ) -> impl Fn(Context) -> std::future::Ready<Result<()>> + Send + Sync + use<> {
        let calls = self.calls.clone();
        let label = label.to_string();
        move |ctx: Context| {
            calls
                .lock()
                .unwrap()
                .push((label.clone(), ctx.args.raw().to_string()));
            std::future::ready(Ok(()))
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls().into_iter().map(|(label, _)| label).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    Text {
        channel: String,
        text: String,
    },
    Embed {
        channel: String,
        text: Option<String>,
        embed: Embed,
    },
    Edit {
        message: String,
        embed: Embed,
    },
    Delete {
        message: String,
    },
    React {
        message: String,
        emoji: String,
    },
    Unreact {
        message: String,
        emoji: String,
        user: String,
    },
}

/// In-memory [`ChatProvider`] that hands out `$m1`, `$m2`, ... as message IDs.
#[derive(Debug)]
pub struct RecordingChat {
    actions: Mutex<Vec<ChatAction>>,
    next_id: AtomicUsize,
    user_id: Option<String>,
}

impl Default for RecordingChat {
    fn default() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            user_id: Some(BOT_ID.to_string()),
        }
    }
}

impl RecordingChat {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn actions(&self) -> Vec<ChatAction> {
        self.actions.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                ChatAction::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Embeds from sends and edits, in order.
    pub fn embeds(&self) -> Vec<Embed> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                ChatAction::Embed { embed, .. } | ChatAction::Edit { embed, .. } => Some(embed),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: ChatAction) {
        self.actions.lock().unwrap().push(action);
    }

    fn next_message_id(&self) -> String {
        format!("$m{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<String> {
        self.record(ChatAction::Text {
            channel: channel_id.to_string(),
            text: text.to_string(),
        });
        Ok(self.next_message_id())
    }

    async fn send_embed(
        &self,
        channel_id: &str,
        text: Option<&str>,
        embed: &Embed,
    ) -> Result<String> {
        self.record(ChatAction::Embed {
            channel: channel_id.to_string(),
            text: text.map(str::to_string),
            embed: embed.clone(),
        });
        Ok(self.next_message_id())
    }

    async fn edit_embed(&self, _channel_id: &str, message_id: &str, embed: &Embed) -> Result<()> {
        self.record(ChatAction::Edit {
            message: message_id.to_string(),
            embed: embed.clone(),
        });
        Ok(())
    }

    async fn delete_message(&self, _channel_id: &str, message_id: &str) -> Result<()> {
        self.record(ChatAction::Delete {
            message: message_id.to_string(),
        });
        Ok(())
    }

    async fn add_reaction(&self, _channel_id: &str, message_id: &str, emoji: &str) -> Result<()> {
        self.record(ChatAction::React {
            message: message_id.to_string(),
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn remove_user_reaction(
        &self,
        _channel_id: &str,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> Result<()> {
        self.record(ChatAction::Unreact {
            message: message_id.to_string(),
            emoji: emoji.to_string(),
            user: user_id.to_string(),
        });
        Ok(())
    }

    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
