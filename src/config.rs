use crate::error::ConfigError;
use log::LevelFilter;
use serde::Deserialize;

/// Where file and command requests go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// The HTTP file and terminal service at `api_base`.
    #[default]
    Remote,
    /// The seeded in-memory tree. Offline demo mode.
    Local,
}

/// Desktop settings handed over by the page as a JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_base: String,
    pub backend: BackendMode,
    /// Show the demo listing when `ls` cannot reach the backend.
    pub fallback_listing: bool,
    pub history_cap: usize,
    pub typewriter_batch: usize,
    pub typewriter_interval_ms: u32,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: "/api".into(),
            backend: BackendMode::Remote,
            fallback_listing: false,
            history_cap: 500,
            typewriter_batch: 3,
            typewriter_interval_ms: 30,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Parse a config object. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Config::default());
        }
        let mut config: Config = serde_json::from_str(json)?;
        config.typewriter_batch = config.typewriter_batch.max(1);
        config.history_cap = config.history_cap.max(1);
        Ok(config)
    }

    pub fn level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
