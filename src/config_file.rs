//! Configuration file handling for googkit
//!
//! Three optional sources are layered into one read-only [`Config`]:
//! the built-in default, the user's file and the project file. A key present
//! in a higher layer replaces the lower layer's value for that key entirely,
//! nested mappings included.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse YAML config file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Config file {0} must contain a mapping with string keys")]
    NotAMapping(PathBuf),
    #[error("Missing config key: {0}")]
    MissingKey(String),
    #[error("Config key '{key}' must be {expected}")]
    InvalidType { key: String, expected: &'static str },
    #[error("Invalid config: {0}")]
    Invalid(#[source] serde_yaml::Error),
}

/// One layer of raw configuration, keyed by top-level name.
pub type Layer = BTreeMap<String, Value>;

/// Locations of the three config sources, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    pub project: Option<PathBuf>,
    pub user: Option<PathBuf>,
    pub default: Option<PathBuf>,
    /// Directory relative config paths are resolved against.
    pub project_root: Option<PathBuf>,
}

/// Reads a single source.
///
/// Returns `Ok(None)` when no path is given or nothing exists at it.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if its top level is not a mapping.
pub fn read_source(path: Option<&Path>) -> Result<Option<Layer>, ConfigError> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        debug!("Config source {} does not exist", path.display());
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let value: Value = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
            source: e,
            path: path.to_path_buf(),
        })?
    } else {
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
            source: e,
            path: path.to_path_buf(),
        })?
    };

    let layer = match value {
        Value::Null => Layer::new(),
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, value)| match key {
                Value::String(key) => Ok((key, value)),
                _ => Err(ConfigError::NotAMapping(path.to_path_buf())),
            })
            .collect::<Result<Layer, ConfigError>>()?,
        _ => return Err(ConfigError::NotAMapping(path.to_path_buf())),
    };
    debug!("Loaded {} keys from {}", layer.len(), path.display());
    Ok(Some(layer))
}

/// Overlays layers in order, lowest priority first. Same-keyed entries are
/// replaced wholesale; nothing is merged recursively.
#[must_use]
pub fn merge_layers<I>(layers: I) -> Layer
where
    I: IntoIterator<Item = Layer>,
{
    layers.into_iter().fold(Layer::new(), |mut merged, layer| {
        merged.extend(layer);
        merged
    })
}

/// The merged, read-only configuration for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: Layer,
    sources: Vec<PathBuf>,
    root: Option<PathBuf>,
}

impl Config {
    /// Loads and merges the three sources: default, then user, then project.
    ///
    /// Absent sources are skipped. If all three are absent the result is an
    /// empty configuration, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present source cannot be read or parsed.
    pub fn load(
        project: Option<&Path>,
        user: Option<&Path>,
        default: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let mut layers = Vec::with_capacity(3);
        let mut sources = Vec::new();
        for path in [default, user, project].into_iter().flatten() {
            if let Some(layer) = read_source(Some(path))? {
                layers.push(layer);
                sources.push(path.to_path_buf());
            }
        }
        Ok(Config {
            values: merge_layers(layers),
            sources,
            root: None,
        })
    }

    /// Loads every source named in `sources` and remembers the project root.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn from_sources(sources: &ConfigSources) -> Result<Config, ConfigError> {
        let mut config = Config::load(
            sources.project.as_deref(),
            sources.user.as_deref(),
            sources.default.as_deref(),
        )?;
        config.root.clone_from(&sources.project_root);
        Ok(config)
    }

    /// Builds a configuration directly from already merged values.
    #[must_use]
    pub fn from_values(values: Layer) -> Config {
        Config {
            values,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` or `ConfigError::InvalidType`.
    pub fn str_value(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?
            .as_str()
            .ok_or_else(|| ConfigError::InvalidType {
                key: key.to_string(),
                expected: "a string",
            })
    }

    /// Deserializes the merged values into a typed view.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the values do not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_yaml::to_value(&self.values)
            .and_then(serde_yaml::from_value)
            .map_err(ConfigError::Invalid)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Files that contributed to this configuration, lowest priority first.
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    #[must_use]
    pub fn project_root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
