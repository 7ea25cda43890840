//! Configuration management for Seedbed
//!
//! This module covers loading/saving configuration, validation, and the
//! runtime configuration that pairs the loaded settings with the selected
//! vocabulary profile.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classify::profile::{self, LanguageProfile};
use crate::error::{Error, Result};
use crate::terminal::output::LineEnding;

/// Main configuration structure for Seedbed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis service configuration
    pub analysis: AnalysisConfig,

    /// Execution service configuration
    pub execution: ExecutionConfig,

    /// Editor behaviour
    pub editor: EditorConfig,

    /// Terminal surface behaviour
    pub terminal: TerminalConfig,
}

/// Analysis ("lex") service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Endpoint receiving `{source_code}` and answering `{tokens, errors}`
    pub endpoint: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/api/lex".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Execution service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Endpoint that starts a run
    pub run_endpoint: String,

    /// Duplex channel carrying `output` / `input_required` / `capture_input`
    pub channel_url: String,

    /// Connect timeout for the start-run request in milliseconds
    ///
    /// The request itself has no overall deadline: it stays open while
    /// the program runs, including while it waits for input.
    pub connect_timeout_ms: u64,

    /// Treat a successful start-run answer as the end of the run
    pub complete_on_response: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            run_endpoint: "http://localhost:5000/api/output".to_string(),
            channel_url: "ws://localhost:5000/ws".to_string(),
            connect_timeout_ms: 10_000,
            complete_on_response: true,
        }
    }
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Vocabulary profile used by the token classifier
    pub profile: String,

    /// Quiet period before an edit triggers a silent analysis
    pub debounce_ms: u64,

    /// Content placed in a fresh editor
    pub initial_source: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            profile: profile::DEFAULT_PROFILE.to_string(),
            debounce_ms: 400,
            initial_source: "root(){\n\t// your code here\n\t\n}".to_string(),
        }
    }
}

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Line ending written for every output line boundary
    pub line_ending: LineEnding,

    /// Banner written once when the terminal is attached
    pub ready_banner: String,

    /// Write the remote prompt when an input request arrives
    pub echo_prompt: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::CrLf,
            ready_banner: "Terminal Ready".to_string(),
            echo_prompt: false,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Endpoint cannot be empty")]
    EmptyEndpoint(&'static str),

    #[error("Invalid endpoint '{1}': expected {2}")]
    InvalidEndpoint(&'static str, String, &'static str),

    #[error("Invalid debounce delay: {0}ms (must be between 10 and 10000)")]
    InvalidDebounce(u64),

    #[error("Timeout must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("Unknown language profile: {0}")]
    UnknownProfile(String),
}

impl ConfigError {
    /// Dotted path of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::EmptyEndpoint(field)
            | ConfigError::InvalidEndpoint(field, _, _)
            | ConfigError::ZeroTimeout(field) => field,
            ConfigError::InvalidDebounce(_) => "editor.debounce_ms",
            ConfigError::UnknownProfile(_) => "editor.profile",
        }
    }
}

impl Config {
    /// Check every field that has a constrained range
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_endpoint("analysis.endpoint", &self.analysis.endpoint, &["http://", "https://"])?;
        check_endpoint(
            "execution.run_endpoint",
            &self.execution.run_endpoint,
            &["http://", "https://"],
        )?;
        check_endpoint("execution.channel_url", &self.execution.channel_url, &["ws://", "wss://"])?;

        if self.analysis.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("analysis.timeout_ms"));
        }
        if self.execution.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("execution.connect_timeout_ms"));
        }

        if !(10..=10_000).contains(&self.editor.debounce_ms) {
            return Err(ConfigError::InvalidDebounce(self.editor.debounce_ms));
        }

        if profile::lookup(&self.editor.profile).is_none() {
            return Err(ConfigError::UnknownProfile(self.editor.profile.clone()));
        }

        Ok(())
    }
}

fn check_endpoint(
    field: &'static str,
    value: &str,
    schemes: &[&'static str],
) -> std::result::Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyEndpoint(field));
    }
    if !schemes.iter().any(|scheme| value.starts_with(scheme)) {
        let expected = if schemes[0].starts_with("ws") {
            "a ws:// or wss:// URL"
        } else {
            "an http:// or https:// URL"
        };
        return Err(ConfigError::InvalidEndpoint(field, value.to_string(), expected));
    }
    Ok(())
}

/// Runtime configuration manager
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Current configuration
    config: Config,
    /// Vocabulary profile resolved from `editor.profile`
    profile: Arc<LanguageProfile>,
    /// Configuration file path
    config_path: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Create a runtime configuration from the default search paths
    pub fn new() -> Result<Self> {
        let config = loader::ConfigLoader::load()?;
        Self::from_config(config, None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config = loader::ConfigLoader::load_from_path(path)?;
        Self::from_config(config, Some(path.to_path_buf()))
    }

    /// Wrap an already loaded configuration
    pub fn from_config(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        config.validate()?;
        let profile = resolve_profile(&config.editor.profile)?;
        Ok(Self {
            config,
            profile,
            config_path,
        })
    }

    /// Save current configuration
    pub fn save(&self) -> Result<PathBuf> {
        let loader = loader::ConfigLoader::new();
        match &self.config_path {
            Some(path) => {
                loader.save_to_path(&self.config, path)?;
                Ok(path.clone())
            }
            None => loader.save(&self.config),
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the active vocabulary profile
    pub fn profile(&self) -> Arc<LanguageProfile> {
        Arc::clone(&self.profile)
    }

    /// Path the configuration was loaded from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Switch to another vocabulary profile
    pub fn set_profile(&mut self, name: &str) -> Result<()> {
        self.profile = resolve_profile(name)?;
        self.config.editor.profile = self.profile.name.to_string();
        info!("Language profile set to '{}'", self.profile.name);
        Ok(())
    }

    /// Replace the configuration after validating it
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        self.profile = resolve_profile(&config.editor.profile)?;
        self.config = config;
        Ok(())
    }
}

fn resolve_profile(name: &str) -> Result<Arc<LanguageProfile>> {
    profile::lookup(name).ok_or_else(|| Error::UnknownProfile {
        name: name.to_string(),
    })
}
