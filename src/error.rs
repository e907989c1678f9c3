use std::path::PathBuf;

use thiserror::Error;

use crate::config_file::ConfigError;

/// Errors raised while running a resolved command list.
///
/// Every variant is fatal to the run: the binary logs it once and exits non-zero.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Command '{command}' requires a configuration, but none was loaded")]
    ConfigRequired { command: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Conflicted files: {}", .0.join(", "))]
    Conflict(Vec<String>),

    #[error("{message}:\n{stderr}")]
    ProcessFailed {
        message: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("No googkit project found in {0} or any of its parents")]
    ProjectNotFound(PathBuf),

    #[error("Template directory not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Unable to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
