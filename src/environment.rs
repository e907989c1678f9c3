use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::argument::Arguments;
use crate::config_file::Config;
use crate::error::Error;
use crate::tree::CommandTree;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Everything a command instance can see during a run.
///
/// Built once per dispatch, after it is known whether configuration is
/// needed, and shared by reference with every instance the run creates,
/// including the members of sequence commands.
#[derive(Debug)]
pub struct Environment<'a> {
    pub cwd: PathBuf,
    pub argument: &'a Arguments,
    pub tree: &'a CommandTree,
    pub config: Option<Config>,
    id: u64,
}

impl<'a> Environment<'a> {
    #[must_use]
    pub fn new(
        cwd: PathBuf,
        argument: &'a Arguments,
        tree: &'a CommandTree,
        config: Option<Config>,
    ) -> Self {
        Environment {
            cwd,
            argument,
            tree,
            config,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Distinct for every environment constructed in this process.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The loaded configuration, on behalf of `command`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigRequired` when the run has no configuration.
    pub fn require_config(&self, command: &str) -> Result<&Config, Error> {
        self.config.as_ref().ok_or_else(|| Error::ConfigRequired {
            command: command.to_string(),
        })
    }
}
