//! # Application Layer
//!
//! The command-routing engine: argument tokenizing, the command tree, the router
//! that dispatches messages into it, and the storage and logging it relies on.

pub mod arguments;
pub mod command;
pub mod context;
pub mod duration;
pub mod handler;
pub mod languages;
pub mod logging;
pub mod matching;
pub mod router;
pub mod storage;

#[cfg(test)]
pub mod testing;
