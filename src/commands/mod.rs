//! Command execution contract
//!
//! A [`CommandClass`] is the registered, declarative side of a command: its
//! name, whether it needs configuration and which options it understands.
//! The tree stores classes behind [`CommandHandle`]s. Each run turns a handle
//! into a one-shot [`Instance`] bound to the shared [`Environment`]; running
//! the instance consumes it, so a command is run at most once.

pub mod build;
pub mod hooks;
pub mod init;
pub mod list;
pub mod sequence;

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::environment::Environment;
use crate::error::Error;

/// Options every command understands.
pub const BASE_OPTIONS: [&str; 2] = ["--log-file", "--verbose"];

/// The command-specific work of a constructed command.
pub trait Command {
    /// Runs the command body. Only called after the config precondition has
    /// been checked.
    ///
    /// # Errors
    ///
    /// Returns any `Error` raised by the command's own logic.
    fn run_internal(&mut self) -> Result<(), Error>;
}

/// Registration-time description of a command variant.
pub trait CommandClass {
    fn name(&self) -> &str;

    /// Whether a run containing this command must load configuration.
    /// Consulted before any instance is constructed.
    fn needs_config(&self) -> bool {
        false
    }

    fn supported_options(&self) -> BTreeSet<&'static str> {
        BTreeSet::from(BASE_OPTIONS)
    }

    /// Builds a fresh command bound to `env`. Must not have side effects.
    fn instantiate<'e>(&self, env: &'e Environment<'e>) -> Box<dyn Command + 'e>;
}

/// Shared handle to a registered command class.
#[derive(Clone)]
pub struct CommandHandle(Rc<dyn CommandClass>);

impl CommandHandle {
    pub fn new<C: CommandClass + 'static>(class: C) -> Self {
        CommandHandle(Rc::new(class))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    #[must_use]
    pub fn needs_config(&self) -> bool {
        self.0.needs_config()
    }

    #[must_use]
    pub fn supported_options(&self) -> BTreeSet<&'static str> {
        self.0.supported_options()
    }

    #[must_use]
    pub fn instantiate<'e>(&self, env: &'e Environment<'e>) -> Instance<'e> {
        Instance {
            class: self.clone(),
            env,
            body: self.0.instantiate(env),
        }
    }
}

impl PartialEq for CommandHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0).cast::<()>(),
            Rc::as_ptr(&other.0).cast::<()>(),
        )
    }
}

impl Eq for CommandHandle {}

impl fmt::Debug for CommandHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandHandle").field(&self.name()).finish()
    }
}

/// A constructed command, ready to run once.
pub struct Instance<'e> {
    class: CommandHandle,
    env: &'e Environment<'e>,
    body: Box<dyn Command + 'e>,
}

impl Instance<'_> {
    /// Runs the command.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigRequired` without touching the command body if
    /// the class needs configuration and the environment has none; otherwise
    /// whatever the body returns.
    pub fn run(mut self) -> Result<(), Error> {
        if self.class.needs_config() && self.env.config.is_none() {
            return Err(Error::ConfigRequired {
                command: self.class.name().to_string(),
            });
        }
        debug!("Running command '{}'", self.class.name());
        self.body.run_internal()
    }
}
