use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the unified monthly CSV snapshot
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Trust selected when no explicit selection has been made
    #[serde(default = "default_trust_code")]
    pub default_trust_code: String,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Reads the optional TOML file named by `NHS_ANALYTICS_CONFIG` (default
    /// `config/default.toml`), then applies `NHS_ANALYTICS__`-prefixed
    /// environment overrides on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("NHS_ANALYTICS_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(
                config::Environment::with_prefix("NHS_ANALYTICS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            default_trust_code: default_trust_code(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/unified_monthly_data_enhanced.csv")
}

fn default_trust_code() -> String {
    "RGT".to_string()
}
