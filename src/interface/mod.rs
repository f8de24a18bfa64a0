//! # Interface Layer
//!
//! The bot surface built on the routing engine: bundled commands, the help
//! pager, router-wide middleware and the mention handler.

pub mod commands;
pub mod middleware;
