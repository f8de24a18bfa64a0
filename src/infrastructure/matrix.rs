//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! Channels are room IDs and message IDs are event IDs. Embeds are sent as
//! markdown, edits use the replacement relation and deletes are redactions.

use crate::domain::traits::ChatProvider;
use crate::domain::types::{Embed, MessageEvent, ReactionEvent};
use crate::strings::render;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use matrix_sdk::Client;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::reaction::{OriginalSyncReactionEvent, ReactionEventContent};
use matrix_sdk::ruma::events::relation::{Annotation, Replacement};
use matrix_sdk::ruma::events::room::message::{
    MessageType, OriginalSyncRoomMessageEvent, Relation, RoomMessageEventContent,
    RoomMessageEventContentWithoutRelation,
};
use matrix_sdk::ruma::{EventId, RoomId};

/// Emoji variation selector some clients append to reaction keys.
const VARIATION_SELECTOR: char = '\u{fe0f}';

#[derive(Clone)]
pub struct MatrixService {
    client: Client,
    display_name: Option<String>,
}

impl MatrixService {
    pub fn new(client: Client, display_name: Option<String>) -> Self {
        Self {
            client,
            display_name,
        }
    }

    fn room(&self, channel_id: &str) -> Result<Room> {
        let room_id = RoomId::parse(channel_id)
            .with_context(|| format!("Invalid room ID {channel_id}"))?;
        self.client
            .get_room(&room_id)
            .ok_or_else(|| anyhow!("Room {channel_id} is not known to this client"))
    }

    async fn send_markdown(&self, channel_id: &str, content: &str) -> Result<String> {
        tracing::info!("Bot sending message to {}: {}", channel_id, content);
        let resp = self
            .room(channel_id)?
            .send(RoomMessageEventContent::text_markdown(content))
            .await?;
        Ok(resp.event_id.to_string())
    }

    /// Replace the body of `event_id` with new markdown.
    async fn internal_edit(&self, channel_id: &str, event_id: &str, new_content: &str) -> Result<()> {
        let event_id = EventId::parse(event_id)?;
        let mut content = RoomMessageEventContent::text_markdown(new_content);
        let replacement_content = RoomMessageEventContentWithoutRelation::from(content.clone());

        content.relates_to = Some(Relation::Replacement(Replacement::new(
            event_id,
            replacement_content,
        )));

        self.room(channel_id)?.send(content).await?;
        Ok(())
    }

    /// Convert an inbound text message into a router event.
    ///
    /// Returns `None` for non-text messages and for the bot's own messages.
    pub fn message_event(
        &self,
        ev: &OriginalSyncRoomMessageEvent,
        room: &Room,
        bot_users: &[String],
    ) -> Option<MessageEvent> {
        let MessageType::Text(text) = &ev.content.msgtype else {
            return None;
        };
        if self.client.user_id() == Some(&*ev.sender) {
            return None;
        }

        let content = match self.client.user_id() {
            Some(own) => normalize_mention(&text.body, own.as_str(), self.display_name.as_deref()),
            None => text.body.clone(),
        };

        Some(MessageEvent {
            content,
            author_id: ev.sender.to_string(),
            author_is_bot: bot_users.iter().any(|u| u == ev.sender.as_str()),
            channel_id: room.room_id().to_string(),
            message_id: ev.event_id.to_string(),
        })
    }

    pub fn reaction_event(ev: &OriginalSyncReactionEvent, room: &Room) -> ReactionEvent {
        let annotation = &ev.content.relates_to;
        ReactionEvent {
            channel_id: room.room_id().to_string(),
            message_id: annotation.event_id.to_string(),
            user_id: ev.sender.to_string(),
            emoji: normalize_emoji(&annotation.key),
        }
    }
}

/// A message that only names the bot (full ID, localpart or display name,
/// optionally followed by `:`) becomes the `<@id>` mention form.
pub fn normalize_mention(body: &str, own_user_id: &str, display_name: Option<&str>) -> String {
    let trimmed = body.trim();
    let name = trimmed.strip_suffix(':').unwrap_or(trimmed);

    let localpart = own_user_id
        .strip_prefix('@')
        .and_then(|rest| rest.split(':').next());

    let is_self = name == own_user_id
        || localpart.is_some_and(|l| name == l)
        || display_name.is_some_and(|d| !d.is_empty() && name == d);

    if is_self {
        format!("<@{own_user_id}>")
    } else {
        body.to_string()
    }
}

pub fn normalize_emoji(key: &str) -> String {
    key.chars().filter(|c| *c != VARIATION_SELECTOR).collect()
}

#[async_trait]
impl ChatProvider for MatrixService {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<String> {
        self.send_markdown(channel_id, text).await
    }

    async fn send_embed(
        &self,
        channel_id: &str,
        text: Option<&str>,
        embed: &Embed,
    ) -> Result<String> {
        self.send_markdown(channel_id, &render::with_text(text, embed))
            .await
    }

    async fn edit_embed(&self, channel_id: &str, message_id: &str, embed: &Embed) -> Result<()> {
        self.internal_edit(channel_id, message_id, &render::embed_to_markdown(embed))
            .await
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        let event_id = EventId::parse(message_id)?;
        self.room(channel_id)?.redact(&event_id, None, None).await?;
        Ok(())
    }

    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<()> {
        let event_id = EventId::parse(message_id)?;
        let content = ReactionEventContent::new(Annotation::new(event_id, emoji.to_string()));
        self.room(channel_id)?.send(content).await?;
        Ok(())
    }

    async fn remove_user_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> Result<()> {
        // Matrix only lets the sender redact their own annotation.
        tracing::debug!(
            "Leaving {}'s {} reaction on {} in {}",
            user_id,
            emoji,
            message_id,
            channel_id
        );
        Ok(())
    }

    fn current_user_id(&self) -> Option<String> {
        self.client.user_id().map(|id| id.to_string())
    }
}
