//! # Errors
//!
//! Typed failures surfaced by the command engine. "Nothing matched" outcomes are
//! never errors; they are `Option`s or fall-throughs.

use std::num::ParseIntError;

/// A typed conversion of an argument failed.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("invalid boolean: {value:?}")]
    InvalidBool { value: String },

    #[error("invalid integer {value:?}: {source}")]
    InvalidInt {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },
}

impl ArgumentError {
    #[must_use]
    pub fn invalid_duration(value: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidDuration {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("stored value for {key:?} is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// The command tree handed to the router builder is malformed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("command name must not be empty")]
    EmptyName,

    #[error("{candidate:?} is claimed by more than one sibling command")]
    DuplicateCandidate { candidate: String },

    #[error("command {name:?} has no handler and no sub-commands")]
    MissingHandler { name: String },

    #[error("router needs at least one non-empty prefix")]
    NoPrefixes,
}
