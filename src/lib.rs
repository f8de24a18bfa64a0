//! # cmdlr
//!
//! Prefix-based command routing for chat bots.
//!
//! - Domain: configuration, event and embed types, the `ChatProvider` gateway trait
//! - Application: tokenizer, command tree, router, storage, logging
//! - Interface: bundled commands, help pager, middleware
//! - Infrastructure: the Matrix gateway

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod strings;

pub use application::arguments::{Argument, Arguments, Codeblock};
pub use application::command::Command;
pub use application::context::Context;
pub use application::handler::{Handler, Middleware};
pub use application::router::{Router, RouterBuilder};
