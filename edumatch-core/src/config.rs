//! Configuration management

use crate::config_error;
use crate::error::{EdumatchError, EdumatchResult, ErrorContext};
use crate::types::{EdumatchConfig, SecurityConfig, SessionConfig};

use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_INPUT_LENGTH: usize = 5000;
pub const DEFAULT_SESSION_TTL_HOURS: u32 = 24;
pub const DEFAULT_SESSION_KEY: &str = "edumatch_session";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// `~/.edumatch/session`, or `./.edumatch/session` when there is no home directory
pub fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".edumatch")
        .join("session")
}

/// `~/.edumatch/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".edumatch")
        .join("config.toml")
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_SESSION_KEY.to_string(),
            storage_dir: default_storage_dir(),
            ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl EdumatchConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> EdumatchResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EdumatchError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: EdumatchConfig = toml::from_str(&content).map_err(|e| EdumatchError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise from the default location if it exists,
    /// otherwise fall back to defaults
    pub fn load(path: Option<&Path>) -> EdumatchResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> EdumatchResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| EdumatchError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| EdumatchError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> EdumatchResult<()> {
        if self.security.max_input_length == 0 {
            return Err(config_error!(
                "security.max_input_length must be greater than 0",
                "config",
                "Set security.max_input_length to a positive value",
            ));
        }

        if self.session.ttl_hours == 0 {
            return Err(config_error!(
                "session.ttl_hours must be greater than 0",
                "config",
                "Set session.ttl_hours to a positive value",
            ));
        }

        if self.session.storage_key.trim().is_empty() {
            return Err(config_error!(
                "session.storage_key must not be empty",
                "config",
                "Set session.storage_key, e.g. \"edumatch_session\"",
            ));
        }

        if !self.session.login_path.starts_with('/') {
            return Err(config_error!(
                "session.login_path must be an absolute path",
                "config",
                "Set session.login_path to a path such as \"/login\"",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EdumatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.security.max_input_length, 5000);
        assert_eq!(config.session.ttl_hours, 24);
        assert_eq!(config.session.login_path, "/login");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EdumatchConfig = toml::from_str("[session]\nttl_hours = 2\n").unwrap();
        assert_eq!(config.session.ttl_hours, 2);
        assert_eq!(config.session.storage_key, DEFAULT_SESSION_KEY);
        assert_eq!(config.security.max_input_length, DEFAULT_MAX_INPUT_LENGTH);
    }

    #[test]
    fn test_validate_rejects_relative_login_path() {
        let mut config = EdumatchConfig::default();
        config.session.login_path = "login".to_string();
        assert!(matches!(config.validate(), Err(EdumatchError::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = EdumatchConfig::default();
        config.session.ttl_hours = 0;
        let err = config.validate().unwrap_err();
        let context = err.context().expect("config errors carry context");
        assert_eq!(context.component, "config");
        assert_eq!(
            context.recovery_suggestions,
            vec!["Set session.ttl_hours to a positive value".to_string()]
        );
    }
}
