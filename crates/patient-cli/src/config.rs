//! File locations for the registry, loaded from an optional TOML file.
//!
//! Precedence, lowest first: built-in defaults, the config file (`--config`
//! or `PATIENTS_CONFIG`), then command-line overrides.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use patient_model::{DEFAULT_ERROR_LOG, DEFAULT_INFO_LOG, FileAuditTrail};
use patient_store::DEFAULT_DATA_FILE;
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "PATIENTS_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Paths used by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatientsConfig {
    /// Backing CSV file.
    pub data_file: PathBuf,
    /// Audit file for successful operations.
    pub info_log: PathBuf,
    /// Audit file for rejected operations.
    pub error_log: PathBuf,
}

impl Default for PatientsConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            info_log: PathBuf::from(DEFAULT_INFO_LOG),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
        }
    }
}

impl PatientsConfig {
    /// Parse a config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit`, else from `PATIENTS_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(explicit, std::env::var_os(CONFIG_ENV_VAR))
    }

    /// [`Self::resolve`] with the environment value passed in.
    pub fn resolve_with(
        explicit: Option<&Path>,
        env_value: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match env_value.filter(|value| !value.is_empty()) {
            Some(value) => Self::load(Path::new(&value)),
            None => Ok(Self::default()),
        }
    }

    /// Replace any path given on the command line.
    #[must_use]
    pub fn with_overrides(
        mut self,
        data_file: Option<PathBuf>,
        info_log: Option<PathBuf>,
        error_log: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = data_file {
            self.data_file = path;
        }
        if let Some(path) = info_log {
            self.info_log = path;
        }
        if let Some(path) = error_log {
            self.error_log = path;
        }
        self
    }

    /// Audit trail writing to the configured log files.
    pub fn audit_trail(&self) -> FileAuditTrail {
        FileAuditTrail::new(&self.info_log, &self.error_log)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}
