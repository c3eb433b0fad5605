//! Persona TOML Loader
//!
//! Loads TOML files from the `config/pantheon/` directory.

use super::preset::by_domain_then_name;
use super::PersonaPreset;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default persona configuration directory
const DEFAULT_PANTHEON_DIR: &str = "config/pantheon";

/// Persona TOML Loader
#[derive(Debug)]
pub struct PersonaLoader {
    config_dir: PathBuf,
}

impl PersonaLoader {
    /// Create loader with default path (`config/pantheon/`)
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_PANTHEON_DIR),
        }
    }

    /// Create loader with custom path
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_dir: path.as_ref().to_path_buf(),
        }
    }

    /// Loader for the per-user directory (`~/.olympus/pantheon`), if a home
    /// directory can be determined
    #[must_use]
    pub fn user() -> Option<Self> {
        dirs::home_dir().map(|home| Self::with_path(home.join(".olympus").join("pantheon")))
    }

    /// Return configuration directory path
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load every `*.toml` preset in the directory, sorted by domain then name.
    ///
    /// A missing directory yields an empty list. Files that fail to parse are
    /// logged and skipped so one bad preset cannot hide the rest.
    ///
    /// # Errors
    /// `Configuration` if the directory exists but cannot be read.
    pub fn load_all(&self) -> Result<Vec<PersonaPreset>> {
        let mut presets: Vec<PersonaPreset> = self
            .toml_files()?
            .into_iter()
            .filter_map(|path| match read_preset(&path) {
                Ok(preset) => {
                    debug!(
                        persona = %preset.persona.name,
                        domain = %preset.persona.domain,
                        "Loaded persona preset"
                    );
                    Some(preset)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping persona preset");
                    None
                }
            })
            .collect();

        presets.sort_by(by_domain_then_name);
        info!(
            count = presets.len(),
            dir = %self.config_dir.display(),
            "Pantheon loaded"
        );
        Ok(presets)
    }

    /// Load one preset by name (case-insensitive file stem)
    ///
    /// # Errors
    /// - `UnknownPersona` when no file exists
    /// - `Configuration` on read or TOML parse failure
    pub fn load(&self, name: &str) -> Result<PersonaPreset> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(Error::UnknownPersona(format!(
                "{} (no {})",
                name,
                path.display()
            )));
        }
        read_preset(&path)
    }

    /// Whether a preset file exists for `name`
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Sorted file stems of the available presets
    ///
    /// # Errors
    /// `Configuration` if the directory exists but cannot be read.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .toml_files()?
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.config_dir
            .join(name.trim().to_lowercase())
            .with_extension("toml")
    }

    /// `*.toml` entries of the directory; empty when it does not exist
    fn toml_files(&self) -> Result<Vec<PathBuf>> {
        if !self.config_dir.is_dir() {
            debug!(dir = %self.config_dir.display(), "No pantheon directory");
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.config_dir).map_err(|e| {
            Error::Configuration(format!(
                "cannot read pantheon directory {}: {}",
                self.config_dir.display(),
                e
            ))
        })?;

        Ok(entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .collect())
    }
}

fn read_preset(path: &Path) -> Result<PersonaPreset> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Configuration(format!("cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Configuration(format!("invalid preset {}: {}", path.display(), e)))
}

impl Default for PersonaLoader {
    fn default() -> Self {
        Self::new()
    }
}
