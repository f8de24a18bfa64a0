//! # Command Handlers
//!
//! The commands the bot ships with. [`register`] adds all of them, plus the
//! audit middleware and mention handler, to a router builder.

pub mod help;
pub mod misc;
pub mod remind;
pub mod settings;

use crate::application::router::RouterBuilder;
use crate::interface::middleware;

pub fn register(builder: RouterBuilder) -> RouterBuilder {
    let mut builder = builder
        .command(help::command())
        .middleware(middleware::audit)
        .mention_handler(middleware::mention);
    for command in misc::commands() {
        builder = builder.command(command);
    }
    builder
        .command(remind::command())
        .command(settings::command())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::router::Router;

    #[test]
    fn test_bundled_commands_build() {
        let router = register(Router::builder().prefix("!")).build().unwrap();
        let names: Vec<_> = router.commands().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["help", "ping", "echo", "whois", "code", "remind", "settings"]
        );
        assert!(router.resolve_path(&["settings", "get"]).is_some());
    }
}
