//! Well-known locations: config sources, project root and scaffold template.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config_file::ConfigSources;
use crate::error::Error;

/// Name of the project config file, which also marks the project root.
pub const PROJECT_CONFIG: &str = "googkit.yaml";

/// Name of the per-user config file in the home directory.
pub const USER_CONFIG: &str = ".googkit.yaml";

/// Environment variable pointing at the googkit installation directory.
pub const HOME_ENV: &str = "GOOGKIT_HOME";

fn install_dir() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV).map(PathBuf::from)
}

/// `$GOOGKIT_HOME/config/default.yaml`
#[must_use]
pub fn default_config() -> Option<PathBuf> {
    install_dir().map(|dir| dir.join("config").join("default.yaml"))
}

/// `$HOME/.googkit.yaml`
#[must_use]
pub fn user_config() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(USER_CONFIG))
}

/// `$GOOGKIT_HOME/template`
#[must_use]
pub fn template_dir() -> Option<PathBuf> {
    install_dir().map(|dir| dir.join("template"))
}

/// Searches `cwd` and its parents for a directory containing [`PROJECT_CONFIG`].
#[must_use]
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let mut path = cwd.to_path_buf();
    debug!("Searching for {PROJECT_CONFIG} in {}", cwd.display());
    loop {
        if path.join(PROJECT_CONFIG).is_file() {
            debug!("Found project root: {}", path.display());
            return Some(path);
        }
        if !path.pop() {
            return None;
        }
    }
}

/// Like [`find_project_root`], but a missing project is an error.
///
/// # Errors
///
/// Returns `Error::ProjectNotFound` if no ancestor holds a project config.
pub fn project_root(cwd: &Path) -> Result<PathBuf, Error> {
    find_project_root(cwd).ok_or_else(|| Error::ProjectNotFound(cwd.to_path_buf()))
}

/// Discovers the three config sources for an invocation from `cwd`.
#[must_use]
pub fn config_sources(cwd: &Path) -> ConfigSources {
    let project_root = find_project_root(cwd);
    ConfigSources {
        project: project_root.as_ref().map(|root| root.join(PROJECT_CONFIG)),
        user: user_config(),
        default: default_config(),
        project_root,
    }
}

/// Changes the process working directory and restores the previous one on drop.
#[derive(Debug)]
pub struct WorkingDirectory {
    previous: PathBuf,
}

impl WorkingDirectory {
    /// # Errors
    ///
    /// Returns `Error::Io` if the current directory cannot be read or `dir`
    /// cannot be entered.
    pub fn enter(dir: &Path) -> Result<Self, Error> {
        let previous = std::env::current_dir().map_err(|e| Error::io(".", e))?;
        std::env::set_current_dir(dir).map_err(|e| Error::io(dir, e))?;
        debug!("Entered {}", dir.display());
        Ok(WorkingDirectory { previous })
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            warn!(
                "Unable to restore working directory {}: {e}",
                self.previous.display()
            );
        }
    }
}
