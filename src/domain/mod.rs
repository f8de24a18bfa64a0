//! # Domain Layer
//!
//! Core definitions, types, and traits that define the contract between the command
//! engine and the chat gateway. Independent of any specific chat framework.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
