//! Configuration loading for Promis.
//!
//! Reads `$PROMIS_CONFIG`, or `~/.promis/config.toml` when the variable is
//! unset, and resolves it into [`RuntimeSettings`]. A missing file yields the
//! defaults.
//!
//! ```toml
//! [scheduler]
//! kind = "microtask"     # or "local_set"
//! flush_budget = 100000
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use promis_types::{FlushBudget, RuntimeSettings, SchedulerKind, SettingsError};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "PROMIS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config at {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: SettingsError,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    scheduler: Option<RawSchedulerConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchedulerConfig {
    kind: Option<SchedulerKind>,
    flush_budget: Option<usize>,
}

impl RawConfig {
    fn resolve(self) -> Result<RuntimeSettings, SettingsError> {
        let scheduler = self.scheduler.unwrap_or_default();
        let flush_budget = match scheduler.flush_budget {
            Some(tasks) => FlushBudget::new(tasks)?,
            None => FlushBudget::default(),
        };
        Ok(RuntimeSettings::new(
            scheduler.kind.unwrap_or_default(),
            flush_budget,
        ))
    }
}

/// Location of the config file, if one can be determined.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".promis").join("config.toml"))
}

/// Load settings from the default location.
pub fn load() -> Result<RuntimeSettings, ConfigError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(RuntimeSettings::default()),
    }
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<RuntimeSettings, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file; using defaults");
        return Ok(RuntimeSettings::default());
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("Failed to read config at {:?}: {}", path, err);
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    parse(&content, path)
}

/// Parse and resolve config text. `path` is only used for error reporting.
pub fn parse(content: &str, path: &Path) -> Result<RuntimeSettings, ConfigError> {
    let raw: RawConfig = match toml::from_str(content) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!("Failed to parse config at {:?}: {}", path, err);
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let settings = raw.resolve().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        scheduler = settings.scheduler().as_str(),
        flush_budget = settings.flush_budget().get(),
        "Loaded config"
    );
    Ok(settings)
}
