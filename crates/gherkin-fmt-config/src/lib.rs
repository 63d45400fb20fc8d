//! Configuration primitives and loader for the gherkin-fmt toolkit.
//!
//! The loader resolves configuration using a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Parsed settings are normalised into typed structures so downstream crates
//! can operate without touching raw TOML.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".gherkin-fmt.toml";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub indent: IndentConfig,
    pub commands: BTreeMap<String, String>,
    pub extensions: Vec<String>,
    pub source: ConfigSource,
}

/// Indentation levels applied by the formatter, in columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndentConfig {
    /// Background and scenario header lines.
    pub background_and_scenario: usize,
    /// Step and examples lines.
    pub step: usize,
    /// Table rows, doc-strings, rule lines and description text.
    pub table_and_doc_string: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            background_and_scenario: 2,
            step: 4,
            table_and_doc_string: 6,
        }
    }
}

/// Where the effective configuration was loaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File(PathBuf),
}

/// Options controlling configuration resolution.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    /// Pin the loader to an explicit configuration file.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Resolve relative lookups against the provided directory instead of
    /// the process working directory.
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }
}

/// Failures raised while locating, parsing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: IndentConfig::default(),
            commands: BTreeMap::new(),
            extensions: vec!["feature".to_string()],
            source: ConfigSource::Default,
        }
    }
}

impl Config {
    /// Resolve configuration using the precedence stack described in the
    /// module docs.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = match &options.working_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir().map_err(|source| ConfigError::Read {
                path: PathBuf::from("."),
                source,
            })?,
        };

        if let Some(path) = &options.config_path {
            return Self::from_file(path);
        }

        let local = working_dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::from_file(&local);
        }

        if let Some(root) = find_git_root(&working_dir) {
            let candidate = root.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    /// Parse and validate the TOML file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_raw(raw, ConfigSource::File(path.to_path_buf()))
    }

    fn from_raw(raw: RawConfig, source: ConfigSource) -> Result<Self, ConfigError> {
        let defaults = IndentConfig::default();
        let indent = IndentConfig {
            background_and_scenario: raw
                .indent
                .background_and_scenario
                .unwrap_or(defaults.background_and_scenario),
            step: raw.indent.step.unwrap_or(defaults.step),
            table_and_doc_string: raw
                .indent
                .table_and_doc_string
                .unwrap_or(defaults.table_and_doc_string),
        };

        for (tag, command) in &raw.commands {
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::Invalid(format!(
                    "command tag '{tag}' must be alphanumeric"
                )));
            }
            if command.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "command for tag '{tag}' is empty"
                )));
            }
        }

        let extensions = match raw.extensions {
            None => Config::default().extensions,
            Some(list) => {
                let mut cleaned = Vec::with_capacity(list.len());
                for ext in list {
                    let trimmed = ext.trim_start_matches('.').to_string();
                    if trimmed.is_empty() {
                        return Err(ConfigError::Invalid(
                            "extensions must not be empty".to_string(),
                        ));
                    }
                    cleaned.push(trimmed);
                }
                cleaned
            }
        };

        Ok(Self {
            indent,
            commands: raw.commands,
            extensions,
            source,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    indent: RawIndent,
    #[serde(default)]
    commands: BTreeMap<String, String>,
    #[serde(default)]
    extensions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIndent {
    background_and_scenario: Option<usize>,
    step: Option<usize>,
    table_and_doc_string: Option<usize>,
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
