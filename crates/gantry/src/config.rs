// File: src/config.rs
// Purpose: Application configuration from gantry.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Whether `/{module}/{controller}/{action}` fallback resolution is
    /// attempted when no declared route matches (default: true)
    #[serde(default = "default_true")]
    pub convention_fallback: bool,

    /// Base path stripped from incoming requests before resolution
    /// (e.g. "/app")
    #[serde(default)]
    pub base_path: Option<String>,
}

// Default values
fn default_name() -> String {
    "gantry-app".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            convention_fallback: default_true(),
            base_path: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
