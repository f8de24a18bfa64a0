//! # Help Text
//!
//! Titles, field labels and templates for the help embeds.

pub const NAME: &str = "help";
pub const DESCRIPTION: &str =
    "Lists all the available commands or displays some information about a specific command";
pub const USAGE: &str = "help [command name]";
pub const EXAMPLE: &str = "help yourCommand";

pub const LIST_COLOR: u32 = 0xffff00;
pub const ERROR_COLOR: u32 = 0xff0000;

pub const INFO_TITLE: &str = "Command Information";
pub const ERROR_TITLE: &str = "Error";

pub const FIELD_NAME: &str = "Name";
pub const FIELD_SUB_COMMANDS: &str = "Sub Commands";
pub const FIELD_ALIASES: &str = "Aliases";
pub const FIELD_DESCRIPTION: &str = "Description";
pub const FIELD_USAGE: &str = "Usage";
pub const FIELD_EXAMPLE: &str = "Example";
pub const FIELD_MESSAGE: &str = "Message";

pub const NO_SUB_COMMANDS: &str = "No sub commands";
pub const NO_ALIASES: &str = "No aliases";

pub fn list_title(page: usize, pages: usize) -> String {
    format!("Command List (Page {page} / {pages})")
}

pub fn list_description(prefix: &str) -> String {
    format!(
        "These are all the available commands. Type `{prefix}help <command_name>` to find out more about a specific command."
    )
}

pub fn info_description(name: &str) -> String {
    format!("Displaying the information for the `{name}` command.")
}

pub fn unknown_command(prefix: &str) -> String {
    format!(
        "```The given command doesn't exist. Type `{prefix}help` for a list of available commands.```"
    )
}

/// Backtick-quoted, comma separated list, or `empty` when there is nothing to list.
pub fn code_list<S: AsRef<str>>(items: &[S], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let joined = items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("`, `");
    format!("`{joined}`")
}

pub fn code_block(text: &str) -> String {
    format!("```{text}```")
}
