//! Core data type definitions

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, loaded from `edumatch.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdumatchConfig {
    pub security: SecurityConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Input sanitizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum length of a sanitized value, in characters
    pub max_input_length: usize,
}

/// Session guard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the slot holding the serialized session record
    pub storage_key: String,
    /// Directory used by the file-backed session store
    pub storage_dir: PathBuf,
    /// Sessions older than this are expired and erased
    pub ttl_hours: u32,
    /// Where denied callers are sent
    pub login_path: String,
}
