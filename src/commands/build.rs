use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::commands::{BASE_OPTIONS, Command, CommandClass, CommandHandle};
use crate::environment::Environment;
use crate::error::Error;
use crate::exec::run_checked;
use crate::fsutil::copy_tree;
use crate::paths::{self, WorkingDirectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Debug,
    Production,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Debug => write!(f, "debug"),
            Mode::Production => write!(f, "production"),
        }
    }
}

/// Copies the development tree to the output directory and runs the
/// configured builder there.
///
/// `--debug` selects `debug_dir` instead of `production_dir`; `--clean`
/// removes the output directory first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Build;

impl Build {
    #[must_use]
    pub fn handle() -> CommandHandle {
        CommandHandle::new(Build)
    }
}

impl CommandClass for Build {
    fn name(&self) -> &str {
        "build"
    }

    fn needs_config(&self) -> bool {
        true
    }

    fn supported_options(&self) -> BTreeSet<&'static str> {
        let mut options = BTreeSet::from(BASE_OPTIONS);
        options.insert("--clean");
        options.insert("--debug");
        options
    }

    fn instantiate<'e>(&self, env: &'e Environment<'e>) -> Box<dyn Command + 'e> {
        Box::new(BuildRun { env })
    }
}

/// The config keys `build` reads. Relative directories are taken from the
/// project root.
#[derive(Debug, Deserialize)]
struct BuildSettings {
    development_dir: PathBuf,
    debug_dir: PathBuf,
    production_dir: PathBuf,
    build: String,
}

impl BuildSettings {
    fn output_dir(&self, mode: Mode) -> &Path {
        match mode {
            Mode::Debug => &self.debug_dir,
            Mode::Production => &self.production_dir,
        }
    }
}

struct BuildRun<'e> {
    env: &'e Environment<'e>,
}

impl BuildRun<'_> {
    /// Copies the development tree into `target`, leaving out the output
    /// directories themselves.
    fn setup_files(
        settings: &BuildSettings,
        root: &Path,
        target: &Path,
        clean: bool,
    ) -> Result<(), Error> {
        if clean && target.exists() {
            info!("Removing {}", target.display());
            std::fs::remove_dir_all(target).map_err(|e| Error::io(target, e))?;
        }

        let ignore = [root.join(&settings.debug_dir), root.join(&settings.production_dir)];
        copy_tree(&root.join(&settings.development_dir), target, &ignore)
    }
}

impl Command for BuildRun<'_> {
    fn run_internal(&mut self) -> Result<(), Error> {
        let config = self.env.require_config("build")?;
        let settings: BuildSettings = config.deserialize()?;
        let root = match config.project_root() {
            Some(root) => root.to_path_buf(),
            None => paths::project_root(self.env.cwd())?,
        };
        let _cwd = WorkingDirectory::enter(&root)?;

        let mode = if self.env.argument.option("--debug") {
            Mode::Debug
        } else {
            Mode::Production
        };
        let target = root.join(settings.output_dir(mode));
        Self::setup_files(&settings, &root, &target, self.env.argument.option("--clean"))?;

        info!("Building for {mode}...");
        let env = HashMap::from([
            ("GOOGKIT_BUILD_MODE".to_string(), mode.to_string()),
            ("GOOGKIT_OUTPUT_DIR".to_string(), target.display().to_string()),
        ]);
        run_checked(&settings.build, &root, &env, "Compilation failed")?;
        info!("Done.");
        Ok(())
    }
}
