//! Commands that hand their work to a shell hook named in the config.

use std::collections::HashMap;

use log::info;

use crate::commands::{Command, CommandClass, CommandHandle};
use crate::environment::Environment;
use crate::error::Error;
use crate::exec::run_checked;

/// Runs the shell command stored under `key` in the project root.
#[derive(Debug, Clone, Copy)]
pub struct HookCommand {
    name: &'static str,
    key: &'static str,
    progress: &'static str,
    failure: &'static str,
}

impl HookCommand {
    /// Fetches the toolchain and libraries (`download`).
    #[must_use]
    pub fn download() -> CommandHandle {
        CommandHandle::new(HookCommand {
            name: "download",
            key: "download",
            progress: "Downloading...",
            failure: "Download failed",
        })
    }

    /// Regenerates dependency metadata (`update_deps`).
    #[must_use]
    pub fn update_deps() -> CommandHandle {
        CommandHandle::new(HookCommand {
            name: "update-deps",
            key: "update_deps",
            progress: "Updating dependencies...",
            failure: "Dependency update failed",
        })
    }

    /// Applies configuration values to project resources (`apply_config`).
    #[must_use]
    pub fn apply_config() -> CommandHandle {
        CommandHandle::new(HookCommand {
            name: "apply-config",
            key: "apply_config",
            progress: "Applying config...",
            failure: "Applying config failed",
        })
    }
}

impl CommandClass for HookCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn needs_config(&self) -> bool {
        true
    }

    fn instantiate<'e>(&self, env: &'e Environment<'e>) -> Box<dyn Command + 'e> {
        Box::new(HookRun { hook: *self, env })
    }
}

struct HookRun<'e> {
    hook: HookCommand,
    env: &'e Environment<'e>,
}

impl Command for HookRun<'_> {
    fn run_internal(&mut self) -> Result<(), Error> {
        let config = self.env.require_config(self.hook.name)?;
        let cmd = config.str_value(self.hook.key)?;
        let root = config.project_root().unwrap_or(self.env.cwd());

        let env = HashMap::from([(
            "GOOGKIT_PROJECT_ROOT".to_string(),
            root.display().to_string(),
        )]);

        info!("{}", self.hook.progress);
        run_checked(cmd, root, &env, self.hook.failure)?;
        info!("Done.");
        Ok(())
    }
}
