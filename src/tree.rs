//! Trie of command-name tokens
//!
//! Every node is either a branch of named children or a leaf holding the
//! ordered list of commands to run for that exact path. Names starting with
//! `_` are internal: they resolve normally but are left out of listings.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use crate::commands::CommandHandle;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot register a command at an empty path")]
    EmptyPath,
    #[error("cannot register an empty command list at '{0}'")]
    EmptyLeaf(String),
}

#[derive(Debug, Clone)]
pub enum CommandNode {
    Branch(HashMap<String, CommandNode>),
    Leaf(Vec<CommandHandle>),
}

/// Whether `name` is hidden from help listings.
#[must_use]
pub fn is_internal(name: &str) -> bool {
    name.starts_with('_')
}

#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    root: HashMap<String, CommandNode>,
}

impl CommandTree {
    /// An empty tree; see [`crate::plugin::Builtins`] for the standard commands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `leaf` at `path`.
    ///
    /// Every token but the last becomes a fresh branch, replacing whatever
    /// was there before; the last token is bound to the leaf. Registering
    /// the same path twice keeps only the second leaf.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::EmptyPath` or `TreeError::EmptyLeaf`.
    pub fn register<S: AsRef<str>>(
        &mut self,
        path: &[S],
        leaf: Vec<CommandHandle>,
    ) -> Result<(), TreeError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(TreeError::EmptyPath);
        };
        if leaf.is_empty() {
            return Err(TreeError::EmptyLeaf(join(path)));
        }

        let mut children = &mut self.root;
        for name in parents {
            let node = children
                .entry(name.as_ref().to_string())
                .insert_entry(CommandNode::Branch(HashMap::new()))
                .into_mut();
            let CommandNode::Branch(next) = node else {
                unreachable!("a branch was just inserted");
            };
            children = next;
        }

        debug!("Registering '{}' -> {:?}", join(path), leaf);
        children.insert(last.as_ref().to_string(), CommandNode::Leaf(leaf));
        Ok(())
    }

    /// The tokens consumed walking from the root: stops before the first
    /// unknown token, or right after the token that reaches a leaf.
    #[must_use]
    pub fn resolve_prefix<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        let mut children = &self.root;
        let mut resolved = Vec::new();
        for token in tokens {
            match children.get(token.as_ref()) {
                None => break,
                Some(node) => {
                    resolved.push(token.as_ref().to_string());
                    match node {
                        CommandNode::Branch(next) => children = next,
                        CommandNode::Leaf(_) => break,
                    }
                }
            }
        }
        resolved
    }

    /// The commands registered for exactly `tokens`.
    ///
    /// Returns `None` when the walk hits an unknown token, ends inside a
    /// branch, or has tokens left over after reaching a leaf.
    #[must_use]
    pub fn command_classes<S: AsRef<str>>(&self, tokens: &[S]) -> Option<&[CommandHandle]> {
        let mut children = &self.root;
        let mut leaf = None;
        for token in tokens {
            if leaf.is_some() {
                return None;
            }
            match children.get(token.as_ref())? {
                CommandNode::Branch(next) => children = next,
                CommandNode::Leaf(commands) => leaf = Some(commands.as_slice()),
            }
        }
        leaf
    }

    /// Sorted, non-internal names of the branch reached by `tokens`.
    ///
    /// Empty when the walk hits an unknown token or a leaf.
    #[must_use]
    pub fn available_children<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        let mut children = &self.root;
        for token in tokens {
            match children.get(token.as_ref()) {
                Some(CommandNode::Branch(next)) => children = next,
                Some(CommandNode::Leaf(_)) | None => return Vec::new(),
            }
        }
        let mut names: Vec<String> = children
            .keys()
            .filter(|name| !is_internal(name))
            .cloned()
            .collect();
        names.sort();
        names
    }
}

fn join<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{Log, Recorder};

    const NONE: [&str; 0] = [];

    fn sample(log: &Log) -> (CommandTree, Vec<CommandHandle>, Vec<CommandHandle>) {
        let build = vec![Recorder::ok("build", log)];
        let apply = vec![Recorder::ok("apply", log), Recorder::ok("deps", log)];
        let mut tree = CommandTree::new();
        tree.register(&["build"], build.clone()).unwrap();
        tree.register(&["config", "apply"], apply.clone()).unwrap();
        tree.register(&["_commands"], vec![Recorder::ok("list", log)])
            .unwrap();
        (tree, build, apply)
    }

    #[test]
    fn test_command_classes_exact_path() {
        let log = Log::default();
        let (tree, build, apply) = sample(&log);

        assert_eq!(tree.command_classes(&["build"]), Some(build.as_slice()));
        assert_eq!(
            tree.command_classes(&["config", "apply"]),
            Some(apply.as_slice())
        );
        assert!(tree.command_classes(&["_commands"]).is_some());
    }

    #[test]
    fn test_trailing_tokens_after_leaf_not_found() {
        let log = Log::default();
        let (tree, _, _) = sample(&log);

        for extra in ["build", "apply", "x", "--debug"] {
            assert_eq!(tree.command_classes(&["build", extra]), None);
            assert_eq!(tree.command_classes(&["config", "apply", extra]), None);
        }
    }

    #[test]
    fn test_branch_or_unknown_not_found() {
        let log = Log::default();
        let (tree, _, _) = sample(&log);

        assert_eq!(tree.command_classes(&NONE), None);
        assert_eq!(tree.command_classes(&["config"]), None);
        assert_eq!(tree.command_classes(&["bogus"]), None);
        assert_eq!(tree.command_classes(&["config", "bogus"]), None);
        assert_eq!(tree.command_classes(&["Build"]), None);
    }

    #[test]
    fn test_resolve_prefix() {
        let log = Log::default();
        let (tree, _, _) = sample(&log);

        assert!(tree.resolve_prefix(&NONE).is_empty());
        assert!(tree.resolve_prefix(&["bogus", "build"]).is_empty());
        assert_eq!(tree.resolve_prefix(&["config"]), vec!["config"]);
        assert_eq!(tree.resolve_prefix(&["config", "nope"]), vec!["config"]);
        assert_eq!(
            tree.resolve_prefix(&["config", "apply", "extra"]),
            vec!["config", "apply"]
        );
        assert_eq!(tree.resolve_prefix(&["build", "build"]), vec!["build"]);
    }

    #[test]
    fn test_available_children() {
        let log = Log::default();
        let (tree, _, _) = sample(&log);

        assert_eq!(tree.available_children(&NONE), vec!["build", "config"]);
        assert_eq!(tree.available_children(&["config"]), vec!["apply"]);
        assert!(tree.available_children(&["build"]).is_empty());
        assert!(tree.available_children(&["bogus"]).is_empty());
        assert!(tree.available_children(&["config", "apply"]).is_empty());
    }

    #[test]
    fn test_register_last_write_wins() {
        let log = Log::default();
        let (mut tree, _, _) = sample(&log);
        let replacement = vec![Recorder::ok("other", &log)];

        tree.register(&["build"], replacement.clone()).unwrap();

        assert_eq!(tree.command_classes(&["build"]), Some(replacement.as_slice()));
    }

    #[test]
    fn test_register_replaces_intermediate_branch() {
        let log = Log::default();
        let (mut tree, _, _) = sample(&log);

        tree.register(&["config", "show"], vec![Recorder::ok("show", &log)])
            .unwrap();

        assert_eq!(tree.available_children(&["config"]), vec!["show"]);
        assert_eq!(tree.command_classes(&["config", "apply"]), None);
    }

    #[test]
    fn test_register_over_leaf_creates_branch() {
        let log = Log::default();
        let (mut tree, _, _) = sample(&log);

        tree.register(&["build", "debug"], vec![Recorder::ok("debug", &log)])
            .unwrap();

        assert_eq!(tree.command_classes(&["build"]), None);
        assert!(tree.command_classes(&["build", "debug"]).is_some());
    }

    #[test]
    fn test_register_rejects_empty_input() {
        let log = Log::default();
        let mut tree = CommandTree::new();

        assert_eq!(
            tree.register(&NONE, vec![Recorder::ok("a", &log)]),
            Err(TreeError::EmptyPath)
        );
        assert_eq!(
            tree.register(&["a", "b"], Vec::new()),
            Err(TreeError::EmptyLeaf("a b".to_string()))
        );
    }
}
