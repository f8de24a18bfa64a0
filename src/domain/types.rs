//! # Domain Types
//!
//! Inbound gateway events and the rich-content structure sent back to channels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message delivered by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageEvent {
    pub content: String,
    pub author_id: String,
    pub author_is_bot: bool,
    pub channel_id: String,
    pub message_id: String,
}

/// A reaction added to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionEvent {
    pub channel_id: String,
    pub message_id: String,
    pub user_id: String,
    pub emoji: String,
}

/// Rich message content: a titled card with named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// RGB colour, e.g. `0xffff00`.
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}
