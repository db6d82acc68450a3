//! Configuration file parsing for `sideonly.toml`.
//!
//! Looked up next to the graph file unless a path is given explicitly.
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sideonly_checker::{CheckOptions, HintOptions};
use sideonly_symbols::{LoadOptions, DEFAULT_ROOT_CLASS};
use thiserror::Error;

pub const CONFIG_FILE: &str = "sideonly.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid toml in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Superclass that contributes no side constraint
    pub root_class: String,
    pub hints: HintsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HintsSection {
    /// Include hints in `check` output
    pub enabled: bool,
    #[serde(flatten)]
    pub options: HintOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_class: DEFAULT_ROOT_CLASS.to_string(),
            hints: HintsSection::default(),
        }
    }
}

impl Default for HintsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            options: HintOptions::default(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The explicit config if given, else `sideonly.toml` beside the graph,
    /// else defaults.
    pub fn discover(graph: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let candidate = graph
            .parent()
            .map(|dir| dir.join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        if candidate.is_file() {
            tracing::debug!("using config {}", candidate.display());
            Self::load_from(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            root_class: self.root_class.clone(),
        }
    }

    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            hints: self.hints.enabled.then(|| self.hints.options.clone()),
        }
    }
}
