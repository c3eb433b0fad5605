//! Configuration loading
//!
//! Embedded defaults, then optional files, then `OLYMPUS_*` environment variables.

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use olympus_core::{EventConfig, LifecycleConfig, OlympusConfig, OrchestrationConfig, SafetyConfig};
use serde::Deserialize;
use std::path::PathBuf;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Binary configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Persona that receives tasks
    #[serde(default = "default_persona")]
    pub persona: String,
    /// Directory with persona TOML files
    #[serde(default = "default_pantheon_dir")]
    pub pantheon_dir: PathBuf,
    /// Safety limits
    #[serde(default)]
    pub safety: SafetyConfig,
    /// Routing
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
    /// Record retention
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Observability sink
    #[serde(default)]
    pub events: EventConfig,
}

fn default_persona() -> String {
    "zeus".to_string()
}

fn default_pantheon_dir() -> PathBuf {
    PathBuf::from("config/pantheon")
}

impl AppConfig {
    /// Engine configuration, validated
    pub fn olympus(&self) -> Result<OlympusConfig> {
        let config = OlympusConfig {
            safety: self.safety.clone(),
            orchestration: self.orchestration.clone(),
            lifecycle: self.lifecycle.clone(),
            events: self.events.clone(),
        };
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("OLYMPUS_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority), e.g. OLYMPUS_SAFETY__MAX_DEPTH
        .add_source(
            Environment::with_prefix("OLYMPUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
