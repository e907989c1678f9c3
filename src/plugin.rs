//! Registration phase: populating the command tree before dispatch.

use std::path::PathBuf;

use log::debug;

use crate::commands::build::Build;
use crate::commands::hooks::HookCommand;
use crate::commands::init::Init;
use crate::commands::list::ListCommands;
use crate::commands::sequence::Sequence;
use crate::commands::CommandHandle;
use crate::paths;
use crate::tree::{CommandTree, TreeError};

/// Something that adds branches and leaves to the tree.
///
/// Registrars run before the tree is handed to the dispatcher. Later
/// registrations replace earlier ones at the same path, so registrars must be
/// passed in dependency order.
pub trait Registrar {
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Returns `TreeError` if a registration is malformed.
    fn register(&self, tree: &mut CommandTree) -> Result<(), TreeError>;
}

/// Runs every registrar against `tree`, in order.
///
/// # Errors
///
/// Stops at and returns the first `TreeError`.
pub fn load(tree: &mut CommandTree, registrars: &[&dyn Registrar]) -> Result<(), TreeError> {
    for registrar in registrars {
        debug!("Loading commands from '{}'", registrar.name());
        registrar.register(tree)?;
    }
    Ok(())
}

/// The standard googkit commands.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    template: Option<PathBuf>,
}

impl Builtins {
    /// Builtins using the template under `$GOOGKIT_HOME`.
    #[must_use]
    pub fn new() -> Self {
        Builtins {
            template: paths::template_dir(),
        }
    }

    #[must_use]
    pub fn with_template(template: PathBuf) -> Self {
        Builtins {
            template: Some(template),
        }
    }
}

impl Registrar for Builtins {
    fn name(&self) -> &str {
        "builtins"
    }

    fn register(&self, tree: &mut CommandTree) -> Result<(), TreeError> {
        let apply_config = HookCommand::apply_config();
        let update_deps = HookCommand::update_deps();
        let setup = CommandHandle::new(Sequence::new(
            "setup",
            vec![
                HookCommand::download(),
                update_deps.clone(),
                apply_config.clone(),
            ],
        ));

        tree.register(&["_commands"], vec![ListCommands::handle()])?;
        tree.register(&["build"], vec![Build::handle()])?;
        tree.register(
            &["config", "apply"],
            vec![apply_config.clone(), update_deps.clone()],
        )?;
        tree.register(&["deps", "update"], vec![update_deps.clone()])?;
        tree.register(&["init"], vec![Init::handle(self.template.clone())])?;
        tree.register(&["ready"], vec![apply_config, update_deps.clone()])?;
        tree.register(&["setup"], vec![setup, update_deps])?;
        Ok(())
    }
}

/// A fresh tree holding the builtins and then every extra registrar.
///
/// # Errors
///
/// Returns the first `TreeError` raised by a registrar.
pub fn default_tree(extra: &[&dyn Registrar]) -> Result<CommandTree, TreeError> {
    let mut tree = CommandTree::new();
    load(&mut tree, &[&Builtins::new()])?;
    load(&mut tree, extra)?;
    Ok(tree)
}
