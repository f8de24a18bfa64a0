//! # Command Tree
//!
//! A command is a node with a name, aliases, a case policy, optional children and
//! an optional handler. Trees are assembled with the consuming setters below and
//! frozen behind `Arc` once handed to the router builder.
//!
//! Sub-command routing peels the first argument: if it names a child, the rest of
//! the raw text is re-tokenized and routing continues in the child. Otherwise the
//! current node's handler runs with the arguments untouched.

use crate::application::arguments::Arguments;
use crate::application::context::Context;
use crate::application::handler::Handler;
use crate::application::matching::{contains, equals, longest_first};
use crate::domain::error::BuildError;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    usage: String,
    example: String,
    flags: Vec<String>,
    ignore_case: bool,
    sub_commands: Vec<Arc<Command>>,
    handler: Option<Arc<dyn Handler>>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn sub_command(mut self, command: Command) -> Self {
        self.sub_commands.push(Arc::new(command));
        self
    }

    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_list(&self) -> &[String] {
        &self.aliases
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn example_text(&self) -> &str {
        &self.example
    }

    pub fn flag_list(&self) -> &[String] {
        &self.flags
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.ignore_case
    }

    pub fn sub_commands(&self) -> &[Arc<Command>] {
        &self.sub_commands
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Name and aliases, longest first.
    pub fn candidates(&self) -> Vec<&str> {
        let all = std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect();
        longest_first(all)
    }

    pub fn sub_command_named(&self, name: &str) -> Option<Arc<Command>> {
        resolve_child(&self.sub_commands, name)
    }

    /// Walk down the tree as far as the leading arguments name sub-commands.
    ///
    /// Returns the deepest matched node and the arguments left for it.
    pub fn resolve(self: &Arc<Self>, args: Arguments) -> (Arc<Command>, Arguments) {
        let mut node = self.clone();
        let mut args = args;
        while !args.is_empty() {
            let Some(child) = node.sub_command_named(args.get(0).raw()) else {
                break;
            };
            tracing::debug!("Descending from '{}' into '{}'", node.name, child.name);
            args = Arguments::parse(args.rest());
            node = child;
        }
        (node, args)
    }

    /// Route `ctx` through the sub-command tree and run the handler it lands on.
    pub async fn trigger(self: &Arc<Self>, ctx: Context) {
        let (target, args) = self.resolve(ctx.args.clone());
        let ctx = if Arc::ptr_eq(&target, self) {
            ctx
        } else {
            ctx.descend(target.clone(), args)
        };

        let Some(handler) = &target.handler else {
            tracing::debug!("Command '{}' has no handler", target.name);
            return;
        };

        tracing::info!(
            "Running command '{}' args='{}' author='{}'",
            target.name,
            ctx.args.raw(),
            ctx.author_id()
        );
        if let Err(e) = handler.handle(ctx).await {
            tracing::error!("Command '{}' failed: {:#}", target.name, e);
        }
    }

    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        if self.name.is_empty() {
            return Err(BuildError::EmptyName);
        }
        if self.sub_commands.is_empty() && self.handler.is_none() {
            return Err(BuildError::MissingHandler {
                name: self.name.clone(),
            });
        }
        validate_siblings(&self.sub_commands)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("ignore_case", &self.ignore_case)
            .field("sub_commands", &self.sub_commands)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Find the sibling that `name` refers to.
///
/// Siblings are visited longest *name* first; within each sibling its own
/// candidates are ordered longest first. Ties keep registration order.
pub fn resolve_child(siblings: &[Arc<Command>], name: &str) -> Option<Arc<Command>> {
    if name.is_empty() {
        return None;
    }

    let mut ordered: Vec<&Arc<Command>> = siblings.iter().collect();
    ordered.sort_by(|a, b| b.name.len().cmp(&a.name.len()));

    ordered
        .into_iter()
        .find(|cmd| contains(&cmd.candidates(), name, cmd.ignore_case))
        .cloned()
}

/// Check each node and that no two siblings share a name or alias.
pub(crate) fn validate_siblings(siblings: &[Arc<Command>]) -> Result<(), BuildError> {
    for (i, a) in siblings.iter().enumerate() {
        a.validate()?;
        for b in &siblings[i + 1..] {
            let ignore_case = a.ignore_case || b.ignore_case;
            for candidate in a.candidates() {
                if b
                    .candidates()
                    .iter()
                    .any(|other| equals(candidate, other, ignore_case))
                {
                    return Err(BuildError::DuplicateCandidate {
                        candidate: candidate.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{Recorder, context_for};

    fn leaf(name: &str) -> Command {
        Command::new(name).handler(|_ctx: Context| async { anyhow::Ok(()) })
    }

    fn arcs(commands: Vec<Command>) -> Vec<Arc<Command>> {
        commands.into_iter().map(Arc::new).collect()
    }

    #[test]
    fn test_longest_name_wins_regardless_of_order() {
        for siblings in [
            arcs(vec![leaf("h"), leaf("help")]),
            arcs(vec![leaf("help"), leaf("h")]),
        ] {
            assert_eq!(resolve_child(&siblings, "help").unwrap().name(), "help");
            assert_eq!(resolve_child(&siblings, "h").unwrap().name(), "h");
        }
    }

    #[test]
    fn test_overlapping_alias_prefers_longer_name() {
        // "ls" is an alias on the short-named node and the name of nothing else;
        // both nodes also claim "l" so the longer *name* must win it.
        let siblings = arcs(vec![
            leaf("l").alias("ls"),
            leaf("list").alias("l"),
        ]);
        assert_eq!(resolve_child(&siblings, "l").unwrap().name(), "list");
        assert_eq!(resolve_child(&siblings, "ls").unwrap().name(), "l");
    }

    #[test]
    fn test_case_policy_is_per_node() {
        let siblings = arcs(vec![leaf("HELP").ignore_case(true), leaf("Info")]);
        assert_eq!(resolve_child(&siblings, "help").unwrap().name(), "HELP");
        assert!(resolve_child(&siblings, "info").is_none());
        assert!(resolve_child(&siblings, "Info").is_some());
    }

    #[test]
    fn test_empty_name_never_matches() {
        let siblings = arcs(vec![leaf("a")]);
        assert!(resolve_child(&siblings, "").is_none());
    }

    #[test]
    fn test_candidates_longest_first() {
        let cmd = Command::new("set").aliases(["s", "assign"]);
        assert_eq!(cmd.candidates(), vec!["assign", "set", "s"]);
    }

    #[test]
    fn test_resolve_descends_and_retokenizes() {
        let root = Arc::new(
            Command::new("config")
                .sub_command(Command::new("user").sub_command(leaf("set")))
                .sub_command(leaf("get")),
        );

        let (node, args) = root.resolve(Arguments::parse(r#"user set name "Jane Doe""#));
        assert_eq!(node.name(), "set");
        assert_eq!(args.amount(), 2);
        assert_eq!(args.get(1).raw(), "Jane Doe");

        let (node, args) = root.resolve(Arguments::parse("unknown x"));
        assert_eq!(node.name(), "config");
        assert_eq!(args.raw(), "unknown x");
    }

    #[tokio::test]
    async fn test_trigger_falls_back_to_parent_handler() {
        let rec = Recorder::default();
        let root = Arc::new(
            Command::new("parent")
                .handler(rec.handler("parent"))
                .sub_command(Command::new("child").handler(rec.handler("child"))),
        );

        root.trigger(context_for(root.clone(), "child a b")).await;
        root.trigger(context_for(root.clone(), "other a b")).await;
        root.trigger(context_for(root.clone(), "")).await;

        assert_eq!(
            rec.calls(),
            vec![
                ("child".to_string(), "a b".to_string()),
                ("parent".to_string(), "other a b".to_string()),
                ("parent".to_string(), "".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_trigger_into_branch_without_handler_runs_nothing() {
        let rec = Recorder::default();
        let root = Arc::new(
            Command::new("parent")
                .handler(rec.handler("parent"))
                .sub_command(Command::new("branch").sub_command(leaf("leaf"))),
        );

        root.trigger(context_for(root.clone(), "branch nope")).await;
        assert!(rec.calls().is_empty());
    }

    #[test]
    fn test_validate() {
        assert_eq!(Command::new("").validate(), Err(BuildError::EmptyName));
        assert_eq!(
            Command::new("bare").validate(),
            Err(BuildError::MissingHandler {
                name: "bare".to_string()
            })
        );
        assert!(Command::new("branch").sub_command(leaf("x")).validate().is_ok());

        let dup = Command::new("root")
            .sub_command(leaf("a").alias("x"))
            .sub_command(leaf("X").ignore_case(true));
        assert_eq!(
            dup.validate(),
            Err(BuildError::DuplicateCandidate {
                candidate: "x".to_string()
            })
        );
    }
}
