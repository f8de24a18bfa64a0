//! # Domain Traits
//!
//! Abstract interface for the chat gateway the router talks back to.
//! Allows for pluggable implementations in the Infrastructure layer.

use crate::domain::types::Embed;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for a Chat Provider (e.g., Matrix, Discord, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a plain message to a channel, returning the new message ID
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<String>;

    /// Send rich content, optionally with accompanying text
    async fn send_embed(&self, channel_id: &str, text: Option<&str>, embed: &Embed)
    -> Result<String>;

    /// Replace the rich content of an existing message
    async fn edit_embed(&self, channel_id: &str, message_id: &str, embed: &Embed) -> Result<()>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()>;

    /// React to a message as the bot
    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<()>;

    /// Remove a reaction placed by `user_id`
    async fn remove_user_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> Result<()>;

    /// Get the account ID the bot is logged in as
    fn current_user_id(&self) -> Option<String>;
}
