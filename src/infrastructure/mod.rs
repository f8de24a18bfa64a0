//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the `ChatProvider` trait from the Domain layer for Matrix.

pub mod matrix;
