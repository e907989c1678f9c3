//! Core implementation of the googkit command-line tool
//!
//! googkit resolves the words of a command line through a tree of command
//! names into one or more commands, loads the layered project configuration
//! when any of them needs it, and runs them in order, stopping at the first
//! failure. Composite commands ([`commands::sequence::Sequence`]) run several
//! commands as one, against the same environment.

pub mod argument;
pub mod commands;
pub mod config_file;
pub mod dispatcher;
pub mod environment;
pub mod error;
pub mod exec;
pub mod fsutil;
pub mod logger;
pub mod paths;
pub mod plugin;
pub mod tree;

pub use argument::Arguments;
pub use commands::{Command, CommandClass, CommandHandle};
pub use config_file::{Config, ConfigError, ConfigSources};
pub use dispatcher::{Dispatcher, Outcome};
pub use environment::Environment;
pub use error::Error;
pub use tree::{CommandTree, TreeError};

/// `googkit <version>`, as printed by `--version`.
#[must_use]
pub fn version() -> String {
    format!("googkit {}", env!("CARGO_PKG_VERSION"))
}
