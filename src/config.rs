use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::EtlError;

pub const DEFAULT_CONFIG_FILE: &str = "census-etl.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub merged_file: Option<String>,
    #[serde(default)]
    pub database_file: Option<String>,
    #[serde(default)]
    pub write_intermediate: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: Utf8PathBuf,
    pub merged_file: String,
    pub database_file: String,
    pub write_intermediate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: Utf8PathBuf::from("output_data"),
            merged_file: "census_data.csv".to_string(),
            database_file: "climate_database.db".to_string(),
            write_intermediate: true,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `census-etl.json` from the working directory when no
    /// path is given. A missing default file yields the default settings.
    pub fn resolve(path: Option<&str>) -> Result<Settings, EtlError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| EtlError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| EtlError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> Settings {
        let defaults = Settings::default();
        Settings {
            output_dir: config
                .output_dir
                .map(Utf8PathBuf::from)
                .unwrap_or(defaults.output_dir),
            merged_file: config.merged_file.unwrap_or(defaults.merged_file),
            database_file: config.database_file.unwrap_or(defaults.database_file),
            write_intermediate: config
                .write_intermediate
                .unwrap_or(defaults.write_intermediate),
        }
    }
}
