use std::path::Path;

use serde::Deserialize;
use validator::Validate;

use crate::error::{PipelineError, Result};
use crate::utils::constants::{DEFAULT_FILE_EXTENSION, DEFAULT_RAW_TABLE, DEFAULT_STATS_TABLE};

/// Default database location for the CLI.
const DEFAULT_DATABASE_URL: &str = "sqlite://weather.db";

/// Runtime settings, resolved from defaults, an optional TOML file, and
/// `WEATHER_*` environment variables (e.g. `WEATHER_DATABASE_URL`).
///
/// Settings are plain values passed into components explicitly; nothing
/// reads the environment after load time.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub database_url: String,
    #[validate(length(min = 1))]
    pub raw_table: String,
    #[validate(length(min = 1))]
    pub stats_table: String,
    #[validate(length(min = 1))]
    pub file_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            raw_table: DEFAULT_RAW_TABLE.to_string(),
            stats_table: DEFAULT_STATS_TABLE.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings, lowest precedence first: built-in defaults,
    /// then the optional config file, then environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)
            .map_err(config_error)?
            .set_default("raw_table", DEFAULT_RAW_TABLE)
            .map_err(config_error)?
            .set_default("stats_table", DEFAULT_STATS_TABLE)
            .map_err(config_error)?
            .set_default("file_extension", DEFAULT_FILE_EXTENSION)
            .map_err(config_error)?;

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix("WEATHER"));

        let settings: Settings = builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        settings.validate()?;
        Ok(settings)
    }
}

fn config_error(err: config::ConfigError) -> PipelineError {
    PipelineError::Config(err.to_string())
}
