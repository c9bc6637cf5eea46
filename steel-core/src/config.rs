//! Block update configuration.

use std::{fs, io, path::Path};

use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/block_updates.json5");

/// Errors that can occur while loading the block update config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid JSON5 for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json5::Error),
    /// The config parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Tuning for the block update scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlockUpdateConfig {
    /// Maximum number of updates drained per world per tick.
    pub max_updates_per_tick: usize,
}

impl BlockUpdateConfig {
    /// Default per-world cap.
    pub const DEFAULT_MAX_UPDATES_PER_TICK: usize = 10_000;

    /// Loads the config at `path`, writing the bundled default there first if
    /// the file doesn't exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::parse(&fs::read_to_string(path)?)?;
            log::debug!("Loaded block update config from {}", path.display());
            return Ok(config);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        log::info!("Wrote default block update config to {}", path.display());
        Ok(Self::default())
    }

    /// Parses and validates a JSON5 config document.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_updates_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "max_updates_per_tick must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for BlockUpdateConfig {
    fn default() -> Self {
        Self {
            max_updates_per_tick: Self::DEFAULT_MAX_UPDATES_PER_TICK,
        }
    }
}
