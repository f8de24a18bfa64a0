//! # Strings Module
//!
//! Centralizes user-facing strings and help text, plus the markdown rendering
//! of embeds for gateways without native rich content.

pub mod help;
pub mod messages;
pub mod render;
