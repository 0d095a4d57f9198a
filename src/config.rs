use crate::models::Dataset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data source configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Index build configuration
    #[serde(default)]
    pub build: BuildConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("RECORD_SEARCH_CONFIG")
            .unwrap_or_else(|_| "config/local.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: RECORD_SEARCH_)
            .add_source(
                config::Environment::with_prefix("RECORD_SEARCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the JSON files
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_users_file")]
    pub users_file: String,

    #[serde(default = "default_organizations_file")]
    pub organizations_file: String,

    #[serde(default = "default_tickets_file")]
    pub tickets_file: String,
}

impl DataConfig {
    /// Path of the JSON file backing `dataset`
    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        let file = match dataset {
            Dataset::Users => &self.users_file,
            Dataset::Organizations => &self.organizations_file,
            Dataset::Tickets => &self.tickets_file,
        };
        self.dir.join(file)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            users_file: default_users_file(),
            organizations_file: default_organizations_file(),
            tickets_file: default_tickets_file(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// What to do when a loader fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// What the index build does when a loader fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailurePolicy {
    /// Discard everything and return the loader's error
    #[default]
    Abort,
    /// Keep the records of the loaders that succeeded
    Partial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_organizations_file() -> String {
    "organizations.json".to_string()
}

fn default_tickets_file() -> String {
    "tickets.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
