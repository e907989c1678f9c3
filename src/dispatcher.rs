//! Process-level orchestration: resolve, load config if needed, run in order.

use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, warn};

use crate::argument::Arguments;
use crate::commands::CommandHandle;
use crate::config_file::{Config, ConfigSources};
use crate::environment::Environment;
use crate::error::Error;
use crate::paths::{self, WorkingDirectory};
use crate::tree::CommandTree;

/// How a dispatch ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `--version` with no command; carries the text to print.
    Version(String),
    /// The tokens did not name a command; carries usage text to print.
    /// This is a hint, not a failure.
    Help(String),
    /// Every resolved command ran successfully.
    Completed,
}

/// Owns the command tree for a run and executes resolved commands.
#[derive(Debug)]
pub struct Dispatcher {
    tree: CommandTree,
    sources: Option<ConfigSources>,
}

impl Dispatcher {
    /// Takes ownership of a fully registered tree; no registration is
    /// possible afterwards.
    #[must_use]
    pub fn new(tree: CommandTree) -> Self {
        Dispatcher {
            tree,
            sources: None,
        }
    }

    /// Uses `sources` instead of discovering them from the working directory.
    #[must_use]
    pub fn with_sources(mut self, sources: ConfigSources) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Resolves `args` and runs the commands found, in order.
    ///
    /// Configuration is loaded once, before any command is constructed, and
    /// only if one of the resolved commands needs it. All commands share one
    /// environment. The first failing command stops the run; work done by
    /// earlier commands is not undone.
    ///
    /// # Errors
    ///
    /// Returns the config loading error or the first command failure.
    pub fn dispatch(&self, args: &Arguments, cwd: &Path) -> Result<Outcome, Error> {
        let tokens = args.commands();
        if tokens.is_empty() && args.option("--version") {
            return Ok(Outcome::Version(crate::version()));
        }

        let Some(classes) = self.tree.command_classes(tokens) else {
            debug!("No command found for {tokens:?}");
            return Ok(Outcome::Help(help_text(&self.tree, tokens)));
        };
        warn_unsupported_options(classes, args);

        let (_project_dir, config) = if classes.iter().any(CommandHandle::needs_config) {
            let (dir, config) = self.load_config(cwd)?;
            (dir, Some(config))
        } else {
            (None, None)
        };

        let env = Environment::new(cwd.to_path_buf(), args, &self.tree, config);
        for class in classes {
            class.instantiate(&env).run()?;
        }
        Ok(Outcome::Completed)
    }

    /// Enters the project root, when there is one, and loads the config.
    fn load_config(&self, cwd: &Path) -> Result<(Option<WorkingDirectory>, Config), Error> {
        let sources = match &self.sources {
            Some(sources) => sources.clone(),
            None => paths::config_sources(cwd),
        };
        let dir = match &sources.project_root {
            Some(root) => Some(WorkingDirectory::enter(root)?),
            None => None,
        };
        let config = Config::from_sources(&sources)?;
        debug!(
            "Loaded config keys {:?} from {:?}",
            config.keys().collect::<Vec<_>>(),
            config.sources()
        );
        Ok((dir, config))
    }
}

fn warn_unsupported_options(classes: &[CommandHandle], args: &Arguments) {
    let supported: BTreeSet<&str> = classes
        .iter()
        .flat_map(CommandHandle::supported_options)
        .collect();
    for option in args.options() {
        if !supported.contains(option) {
            warn!("Ignoring unsupported option: {option}");
        }
    }
}

/// Usage text for the deepest branch `tokens` reach.
#[must_use]
pub fn help_text<S: AsRef<str>>(tree: &CommandTree, tokens: &[S]) -> String {
    let resolved = tree.resolve_prefix(tokens);
    let mut lines = Vec::new();
    if resolved.is_empty() {
        lines.push("Usage: googkit <command>".to_string());
    } else {
        lines.push(format!("Usage: googkit {} <command>", resolved.join(" ")));
    }
    lines.push(String::new());
    lines.push("Available commands:".to_string());
    for name in tree.available_children(&resolved) {
        lines.push(format!("    {name}"));
    }
    lines.join("\n")
}
