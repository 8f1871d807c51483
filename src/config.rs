use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONTEXT: &str = "local";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9081";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("context '{0}' is not defined")]
    MissingContext(String),

    #[error("context '{0}' has an empty endpoint")]
    EmptyEndpoint(String),
}

/// meshctl configuration loaded from config.toml and environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub current_context: String,
    #[serde(default)]
    pub contexts: BTreeMap<String, Context>,
}

/// A named Meshery deployment the client can talk to
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Context {
    pub endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut contexts = BTreeMap::new();
        contexts.insert(
            DEFAULT_CONTEXT.to_string(),
            Context {
                endpoint: DEFAULT_ENDPOINT.to_string(),
            },
        );

        Self {
            current_context: DEFAULT_CONTEXT.to_string(),
            contexts,
        }
    }
}

impl Config {
    /// Load configuration from `path` (or ~/.meshery/config.toml) and environment
    /// variables. Environment variables take precedence over config file values.
    ///
    /// A missing default file falls back to the built-in local context, a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a config file without applying overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("MESHCTL_CONTEXT") {
            if !val.trim().is_empty() {
                self.current_context = val;
            }
        }

        if let Ok(val) = env::var("MESHCTL_ENDPOINT") {
            if !val.trim().is_empty() {
                self.contexts
                    .entry(self.current_context.clone())
                    .or_insert_with(|| Context {
                        endpoint: String::new(),
                    })
                    .endpoint = val;
            }
        }
    }

    /// Check that the current context exists and points somewhere
    pub fn validate(&self) -> Result<(), ConfigError> {
        let context = self.current()?;
        if context.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint(self.current_context.clone()));
        }
        Ok(())
    }

    /// Get the active context
    pub fn current(&self) -> Result<&Context, ConfigError> {
        self.contexts
            .get(&self.current_context)
            .ok_or_else(|| ConfigError::MissingContext(self.current_context.clone()))
    }

    /// Root URL of the Meshery server, without a trailing slash.
    ///
    /// Returns an empty string if the current context is missing; `load` never
    /// hands out such a config.
    pub fn base_service_url(&self) -> String {
        self.current()
            .map(|ctx| ctx.endpoint.trim().trim_end_matches('/').to_string())
            .unwrap_or_default()
    }
}

/// Location of the user's config file, if a home directory is known
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".meshery").join("config.toml"))
}
