//! # Messages
//!
//! Replies sent by the bundled commands.

pub const PONG: &str = "🏓 Pong!";
pub const ECHO_USAGE: &str = "Usage: `echo <text>`";
pub const WHOIS_USAGE: &str = "Usage: `whois <@user>`";
pub const CODE_USAGE: &str = "Usage: `code` followed by a code block";
pub const REMIND_USAGE: &str = "Usage: `remind <duration> <text>`";
pub const SETTINGS_USAGE: &str = "Usage: `settings get <key>`, `settings set <key> <value>` or `settings prefixes`";
pub const SETTINGS_GET_USAGE: &str = "Usage: `settings get <key>`";
pub const SETTINGS_SET_USAGE: &str = "Usage: `settings set <key> <value>`";

pub fn whois(user_id: &str) -> String {
    format!("That is user `{user_id}`.")
}

pub fn code_summary(language: &str, lines: usize) -> String {
    let language = if language.is_empty() { "plain text" } else { language };
    format!("Got {lines} line(s) of {language}.")
}

pub fn remind_scheduled(when: &str) -> String {
    format!("⏰ Reminder set for {when} from now.")
}

pub fn remind_fire(author_id: &str, text: &str) -> String {
    format!("⏰ <@{author_id}> {text}")
}

pub const REMIND_IN_PAST: &str = "That time has already passed.";

pub fn invalid_argument(err: &str) -> String {
    format!("⚠️ {err}")
}

pub fn setting_value(key: &str, value: &str) -> String {
    format!("`{key}` = `{value}`")
}

pub fn setting_missing(key: &str) -> String {
    format!("`{key}` is not set.")
}

pub fn setting_stored(key: &str) -> String {
    format!("Stored `{key}`.")
}

pub fn prefixes(list: &str) -> String {
    format!("My prefixes are: {list}")
}

pub fn mention_reply(prefix: &str) -> String {
    format!("👋 My prefix is `{prefix}`. Try `{prefix}help`.")
}
