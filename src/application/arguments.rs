//! # Arguments
//!
//! Splits the text following a command into tokens and offers typed views over them.
//!
//! Tokens are separated by ASCII whitespace. A double-quoted span (`"like this"`)
//! becomes a single token with the quotes stripped, as long as it is closed and
//! not empty. Code blocks are extracted from the whole raw string rather than from
//! individual tokens.

use crate::application::duration::parse_duration;
use crate::application::languages::is_known_language;
use crate::application::matching::trim_quotes;
use crate::domain::error::ArgumentError;
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?([0-9]+)>").expect("valid regex"));
static ROLE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@&([0-9]+)>").expect("valid regex"));
static CHANNEL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<#([0-9]+)>").expect("valid regex"));

// ```lang\n ... ``` (the language line is optional)
static FENCED_CODEBLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\n*```(?:([\w.\-]*)\n)?(.*)```").expect("valid regex"));
// `...`
static INLINE_CODEBLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\n*`(.*)`").expect("valid regex"));

static EMPTY: Argument = Argument { raw: String::new() };

/// A single token. Never mutated after the tokenizer creates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argument {
    raw: String,
}

/// Ordered tokens plus the raw text they were parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    raw: String,
    args: Vec<Argument>,
    /// Byte offset in `raw` just past each token (past the closing quote for quoted spans).
    ends: Vec<usize>,
}

/// Result of [`Arguments::as_codeblock`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codeblock {
    pub language: String,
    pub content: String,
}

impl Arguments {
    /// Tokenize `raw`.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (args, ends) = tokenize(&raw).into_iter().unzip();
        Self { raw, args, ends }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn amount(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The token at `n`, or an empty token when out of range.
    pub fn get(&self, n: usize) -> &Argument {
        self.args.get(n).unwrap_or(&EMPTY)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter()
    }

    /// The whole raw string as one token.
    pub fn as_single(&self) -> Argument {
        Argument::new(self.raw.clone())
    }

    /// Raw text after the first token, with later tokens spelled as typed.
    pub fn rest(&self) -> &str {
        self.ends
            .first()
            .and_then(|&end| self.raw.get(end..))
            .unwrap_or("")
            .trim_start()
    }

    /// Remove the token at `n`. The raw string is rebuilt by joining the
    /// remaining tokens with single spaces, so original spacing and quoting are lost.
    pub fn remove(&mut self, n: usize) {
        if n >= self.args.len() {
            return;
        }
        self.args.remove(n);

        let joined = self
            .args
            .iter()
            .map(Argument::raw)
            .collect::<Vec<_>>()
            .join(" ");
        let lead = joined.len() - joined.trim_start().len();
        let raw = joined.trim().to_string();

        let mut offset = 0;
        self.ends = self
            .args
            .iter()
            .map(|arg| {
                offset += arg.raw.len();
                let end = offset.saturating_sub(lead).min(raw.len());
                offset += 1;
                end
            })
            .collect();
        self.raw = raw;
    }

    /// Extract a fenced (```` ``` ````) or, failing that, inline (`` ` ``) code block
    /// from the raw string. `None` when neither is present.
    pub fn as_codeblock(&self) -> Option<Codeblock> {
        if let Some(caps) = FENCED_CODEBLOCK.captures(&self.raw) {
            let tag = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());

            return Some(if is_known_language(tag) {
                Codeblock {
                    language: tag.to_string(),
                    content: body.to_string(),
                }
            } else if tag.is_empty() {
                Codeblock {
                    language: String::new(),
                    content: body.to_string(),
                }
            } else {
                // Not a language after all: it's the first line of the content.
                Codeblock {
                    language: String::new(),
                    content: format!("{tag}\n{body}"),
                }
            });
        }

        INLINE_CODEBLOCK.captures(&self.raw).map(|caps| Codeblock {
            language: String::new(),
            content: caps.get(1).map_or("", |m| m.as_str()).to_string(),
        })
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

impl Argument {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
    pub fn as_bool(&self) -> Result<bool, ArgumentError> {
        match self.raw.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ArgumentError::InvalidBool {
                value: self.raw.clone(),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i32, ArgumentError> {
        self.raw.parse().map_err(|source| ArgumentError::InvalidInt {
            value: self.raw.clone(),
            source,
        })
    }

    pub fn as_int64(&self) -> Result<i64, ArgumentError> {
        self.raw.parse().map_err(|source| ArgumentError::InvalidInt {
            value: self.raw.clone(),
            source,
        })
    }

    /// ID from `<@id>` or `<@!id>`, empty if the token is no user mention.
    pub fn as_user_mention_id(&self) -> &str {
        capture(&USER_MENTION, &self.raw)
    }

    /// ID from `<@&id>`, empty if the token is no role mention.
    pub fn as_role_mention_id(&self) -> &str {
        capture(&ROLE_MENTION, &self.raw)
    }

    /// ID from `<#id>`, empty if the token is no channel mention.
    pub fn as_channel_mention_id(&self) -> &str {
        capture(&CHANNEL_MENTION, &self.raw)
    }

    /// Relative (`1h30m`, `now+2d`) or absolute (`2026-01-12T18:00:00Z`) time,
    /// as an offset from the current wall-clock time.
    pub fn as_duration(&self) -> Result<TimeDelta, ArgumentError> {
        self.as_duration_at(Utc::now())
    }

    pub fn as_duration_at(&self, now: DateTime<Utc>) -> Result<TimeDelta, ArgumentError> {
        parse_duration(&self.raw, now)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn capture<'a>(pattern: &Regex, text: &'a str) -> &'a str {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Scan `raw` into tokens, returning each token with the byte offset just past it.
fn tokenize(raw: &str) -> Vec<(Argument, usize)> {
    let bytes = raw.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        if bytes[i] == b'"' {
            let close = raw[i + 1..].find('"').map(|p| i + 1 + p);
            // `""` is not a quoted span; it falls through to a plain token.
            if let Some(close) = close.filter(|&c| c > i + 1) {
                tokens.push((Argument::new(&raw[i + 1..close]), close + 1));
                i = close + 1;
                continue;
            }
        }

        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let token = trim_quotes(&raw[start..i]);
        if !token.is_empty() {
            tokens.push((Argument::new(token), i));
        }
    }

    tokens
}
