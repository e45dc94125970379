//! TOML Configuration File Support
//!
//! Centralized configuration loading for the calculator, with an optional
//! TOML file at `~/.config/calculator/calculator.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! url = "http://localhost:8080"
//! request_timeout_ms = 10000
//!
//! [display]
//! error_display_ms = 3000
//!
//! [behavior]
//! error_reset = "preserve"
//! ```
//!
//! # Environment Variables
//!
//! - `CALCULATOR_SERVER_URL`
//! - `CALCULATOR_REQUEST_TIMEOUT_MS`
//! - `CALCULATOR_ERROR_DISPLAY_MS`
//! - `CALCULATOR_ERROR_RESET` (`preserve` or `cancel_on_edit`)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::{EditorConfig, ErrorResetPolicy, DEFAULT_ERROR_DISPLAY};

/// Service URL used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Server section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerToml {
    /// Calculation service root URL
    pub url: Option<String>,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: Option<u64>,
}

/// Display section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// How long an error stays on screen, in milliseconds
    pub error_display_ms: Option<u64>,
}

/// Behavior section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorToml {
    /// How edits interact with a pending error reset
    pub error_reset: Option<ErrorResetPolicy>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorToml {
    /// Server configuration section
    pub server: ServerToml,

    /// Display configuration section
    pub display: DisplayToml,

    /// Behavior configuration section
    pub behavior: BehaviorToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Effective calculator configuration
///
/// Use [`load_config`] to build one with proper priority handling.
#[derive(Clone, Debug)]
pub struct CalculatorConfig {
    /// Calculation service root URL
    pub server_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// How long an error stays on screen
    pub error_display: Duration,

    /// How edits interact with a pending error reset
    pub error_reset: ErrorResetPolicy,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            error_display: DEFAULT_ERROR_DISPLAY,
            error_reset: ErrorResetPolicy::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CalculatorConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Editor settings derived from this configuration
    #[must_use]
    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            error_display: self.error_display,
            error_reset: self.error_reset,
        }
    }

    /// Check that values are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a non-HTTP URL or a zero
    /// duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "server url must start with http:// or https://, got '{}'",
                self.server_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.error_display.is_zero() {
            return Err(ConfigError::ValidationError(
                "error display time must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/calculator/calculator.toml` or
/// `~/.config/calculator/calculator.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calculator").join("calculator.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting values fail validation. A missing config file is not an
/// error (defaults are used).
pub fn load_config() -> Result<CalculatorConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the resulting values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CalculatorConfig, ConfigError> {
    let config = load_layers(path)?;
    config.validate()?;
    Ok(config)
}

/// Load file and environment layers, then apply CLI overrides
///
/// Validation runs once, on the final values, so an override can replace
/// an invalid file or environment value.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, or if the
/// overridden configuration fails validation.
pub fn load_config_with_overrides(
    path: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<CalculatorConfig, ConfigError> {
    let mut config = load_layers(path)?;
    overrides.apply(&mut config)?;
    Ok(config)
}

/// Defaults, then the TOML file, then environment variables
fn load_layers(path: Option<PathBuf>) -> Result<CalculatorConfig, ConfigError> {
    let mut config = CalculatorConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CalculatorToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config)?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CalculatorConfig, toml: &CalculatorToml) {
    if let Some(ref url) = toml.server.url {
        config.server_url = url.clone();
    }
    if let Some(ms) = toml.server.request_timeout_ms {
        config.request_timeout = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.display.error_display_ms {
        config.error_display = Duration::from_millis(ms);
    }
    if let Some(policy) = toml.behavior.error_reset {
        config.error_reset = policy;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut CalculatorConfig) -> Result<(), ConfigError> {
    if let Ok(url) = std::env::var("CALCULATOR_SERVER_URL") {
        config.server_url = url;
        config.source = ConfigSource::Env;
    }
    if let Ok(timeout) = std::env::var("CALCULATOR_REQUEST_TIMEOUT_MS") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.request_timeout = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(display) = std::env::var("CALCULATOR_ERROR_DISPLAY_MS") {
        if let Ok(ms) = display.parse::<u64>() {
            config.error_display = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(policy) = std::env::var("CALCULATOR_ERROR_RESET") {
        config.error_reset = policy.parse().map_err(ConfigError::ValidationError)?;
        config.source = ConfigSource::Env;
    }
    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Pass to [`load_config_with_overrides`] to layer command-line arguments
/// over the file and environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Server URL override
    pub server_url: Option<String>,

    /// Request timeout override (milliseconds)
    pub request_timeout_ms: Option<u64>,

    /// Error reset policy override
    pub error_reset: Option<ErrorResetPolicy>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server URL override
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = Some(ms);
        self
    }

    /// Set error reset policy override
    #[must_use]
    pub fn with_error_reset(mut self, policy: ErrorResetPolicy) -> Self {
        self.error_reset = Some(policy);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden configuration fails validation.
    pub fn apply(&self, config: &mut CalculatorConfig) -> Result<(), ConfigError> {
        if self.server_url.is_some()
            || self.request_timeout_ms.is_some()
            || self.error_reset.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.server_url {
            config.server_url = url.clone();
        }
        if let Some(ms) = self.request_timeout_ms {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(policy) = self.error_reset {
            config.error_reset = policy;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
