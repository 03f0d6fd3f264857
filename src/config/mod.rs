//! Configuration management.

use crate::io::formats::DEFAULT_MAX_PAYLOAD_BYTES;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file.
pub const CONFIG_PATH_ENV: &str = "INTAKE_CONFIG_PATH";

/// Main configuration for intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Payloads above this many bytes are rejected before parsing.
    pub max_payload_bytes: usize,
    /// Errors listed in a failure report.
    pub error_display_limit: usize,
    /// Errors listed in a confirmation prompt.
    pub confirm_preview_limit: usize,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive, e.g. `intake=debug`.
    pub filter: Option<String>,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Payload cap in bytes.
    pub max_payload_bytes: Option<usize>,
    /// Errors listed in a failure report.
    pub error_display_limit: Option<usize>,
    /// Errors listed in a confirmation prompt.
    pub confirm_preview_limit: Option<usize>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            error_display_limit: 10,
            confirm_preview_limit: 5,
            logging: LoggingSettings::default(),
        }
    }
}

impl IntakeConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has mistyped keys.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/intake/` on macOS)
    /// 2. XDG config dir (`~/.config/intake/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        Self::default_paths()
            .into_iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(&path).ok())
            .unwrap_or_default()
    }

    /// Resolves configuration the way the CLI does: an explicit path, then
    /// [`CONFIG_PATH_ENV`], then the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded.
    pub fn resolve(explicit: Option<&Path>) -> crate::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_file(Path::new(&path)),
            _ => Ok(Self::load_default()),
        }
    }

    fn default_paths() -> Vec<PathBuf> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Vec::new();
        };
        vec![
            base_dirs.config_dir().join("intake").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("intake")
                .join("config.toml"),
        ]
    }

    /// Converts a `ConfigFile` to `IntakeConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(bytes) = file.max_payload_bytes {
            config.max_payload_bytes = bytes;
        }
        if let Some(limit) = file.error_display_limit {
            config.error_display_limit = limit;
        }
        if let Some(limit) = file.confirm_preview_limit {
            config.confirm_preview_limit = limit;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Sets the payload cap.
    #[must_use]
    pub const fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }
}
